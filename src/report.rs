//! Result sinks that render page results as they arrive.

use std::io::{self, Write};

use serde::Serialize;

use crate::frequency::WordFrequency;
use crate::models::{Outcome, PageResult, Stage};
use crate::pipeline::RunStats;

/// Consumer of page results, called from a single task in arrival order.
pub trait ResultSink {
    fn accept(&mut self, result: PageResult) -> io::Result<()>;

    /// Called once after the last result; nothing arrives afterwards.
    fn finish(&mut self, _stats: &RunStats) -> io::Result<()> {
        Ok(())
    }
}

impl ResultSink for Vec<PageResult> {
    fn accept(&mut self, result: PageResult) -> io::Result<()> {
        self.push(result);
        Ok(())
    }
}

/// Plain-text report, one block per page.
pub struct TextReport<W> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for TextReport<W> {
    fn accept(&mut self, result: PageResult) -> io::Result<()> {
        match &result.outcome {
            Outcome::Success(analysis) => {
                writeln!(self.out, "\nResults for {}:", result.url)?;
                writeln!(self.out, "Top words:")?;
                if analysis.top_words.is_empty() {
                    writeln!(self.out, "  (none)")?;
                }
                for (rank, entry) in analysis.top_words.iter().enumerate() {
                    writeln!(self.out, "  {:>2}. {} ({})", rank + 1, entry.word, entry.count)?;
                }
                writeln!(self.out, "Summary:")?;
                if analysis.summary.is_empty() {
                    writeln!(self.out, "  (no summary available)")?;
                } else {
                    writeln!(self.out, "{}", analysis.summary_text())?;
                }
            }
            Outcome::Failed { stage, reason } => {
                writeln!(
                    self.out,
                    "\nFailed to process {} while {}: {}",
                    result.url, stage, reason
                )?;
            }
        }
        self.out.flush()
    }

    fn finish(&mut self, stats: &RunStats) -> io::Result<()> {
        writeln!(
            self.out,
            "\nProcessed {} pages: {} succeeded, {} failed",
            stats.total, stats.succeeded, stats.failed
        )?;
        self.out.flush()
    }
}

#[derive(Serialize)]
struct ReportLine<'a> {
    data: Option<PageData<'a>>,
    meta: ReportMeta<'a>,
}

#[derive(Serialize)]
struct PageData<'a> {
    word_count: usize,
    top_words: &'a [WordFrequency],
    summary: String,
}

#[derive(Serialize)]
struct ReportMeta<'a> {
    url: &'a str,
    status: &'static str,
    stage: Option<Stage>,
    timestamp: String,
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct ReportTally<'a> {
    tally: &'a RunStats,
}

/// One JSON object per line with a `{ data, meta }` envelope, followed by a
/// final tally line.
pub struct JsonLinesReport<W> {
    out: W,
}

impl<W: Write> JsonLinesReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonLinesReport<W> {
    fn accept(&mut self, result: PageResult) -> io::Result<()> {
        let timestamp = result.scraped_at.to_rfc3339();
        let line = match &result.outcome {
            Outcome::Success(analysis) => ReportLine {
                data: Some(PageData {
                    word_count: analysis.word_count,
                    top_words: &analysis.top_words,
                    summary: analysis.summary_text(),
                }),
                meta: ReportMeta {
                    url: &result.url,
                    status: "success",
                    stage: None,
                    timestamp,
                    message: None,
                },
            },
            Outcome::Failed { stage, reason } => ReportLine {
                data: None,
                meta: ReportMeta {
                    url: &result.url,
                    status: "error",
                    stage: Some(*stage),
                    timestamp,
                    message: Some(reason),
                },
            },
        };

        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn finish(&mut self, stats: &RunStats) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &ReportTally { tally: stats })?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
