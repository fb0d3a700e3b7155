use std::path::PathBuf;

use crate::models::Stage;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Error parsing content: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Summary sentence count must be at least 1, got {0}")]
    SummarizerInput(usize),

    #[error("Failed to read {}: {source}", path.display())]
    InputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// The pipeline stage a per-page error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            AppError::FetchError(_) => Stage::Fetching,
            AppError::ParseError(_) => Stage::Extracting,
            _ => Stage::Analyzing,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
