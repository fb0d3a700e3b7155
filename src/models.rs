use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::frequency::WordFrequency;

/// Stage a page had reached when its processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetching,
    Extracting,
    Analyzing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Analyzing => "analyzing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnalysis {
    /// Whitespace-separated tokens in the extracted text.
    pub word_count: usize,
    pub top_words: Vec<WordFrequency>,
    /// Selected sentences in document order.
    pub summary: Vec<String>,
}

impl PageAnalysis {
    pub fn summary_text(&self) -> String {
        self.summary.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success(PageAnalysis),
    Failed { stage: Stage, reason: String },
}

/// Terminal output for one input address. Exactly one is produced per
/// address, whether or not processing succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub outcome: Outcome,
}

impl PageResult {
    pub fn success(url: String, analysis: PageAnalysis) -> Self {
        Self {
            url,
            scraped_at: Utc::now(),
            outcome: Outcome::Success(analysis),
        }
    }

    pub fn failed(url: String, stage: Stage, reason: impl fmt::Display) -> Self {
        Self {
            url,
            scraped_at: Utc::now(),
            outcome: Outcome::Failed {
                stage,
                reason: reason.to_string(),
            },
        }
    }

    pub fn from_error(url: String, err: &AppError) -> Self {
        Self::failed(url, err.stage(), err)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn analysis(&self) -> Option<&PageAnalysis> {
        match &self.outcome {
            Outcome::Success(analysis) => Some(analysis),
            Outcome::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_text_joins_with_single_spaces() {
        let analysis = PageAnalysis {
            word_count: 6,
            top_words: Vec::new(),
            summary: vec!["One.".to_string(), "Two!".to_string()],
        };
        assert_eq!(analysis.summary_text(), "One. Two!");
    }

    #[test]
    fn failures_carry_their_stage() {
        let result = PageResult::from_error(
            "https://example.com".to_string(),
            &AppError::ParseError("No <body> tag found in the HTML".to_string()),
        );
        assert!(!result.is_success());
        assert!(result.analysis().is_none());
        assert!(matches!(
            result.outcome,
            Outcome::Failed { stage: Stage::Extracting, ref reason } if reason.contains("<body>")
        ));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = Outcome::Failed {
            stage: Stage::Fetching,
            reason: "timed out".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "failed", "stage": "fetching", "reason": "timed out" })
        );
    }
}
