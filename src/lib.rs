pub mod config;
pub mod error;
pub mod frequency;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod scraper;
pub mod stopwords;
pub mod summarizer;

use std::io;

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::pipeline::{Pipeline, RunStats};
use crate::report::{JsonLinesReport, ResultSink, TextReport};
use crate::scraper::Fetcher;

/// Loads the inputs named by `config`, processes every target and writes
/// the report to stdout. Individual page failures do not make this fail.
pub async fn run(config: Config) -> Result<RunStats> {
    let stopwords = input::load_stopwords(config.exclude.as_deref()).await?;
    let targets = input::load_targets(&config.targets).await?;

    let fetcher = Fetcher::new(config.fetch)?;
    let pipeline = Pipeline::new(fetcher, stopwords, config.analysis, config.workers);

    let mut sink: Box<dyn ResultSink> = match config.format {
        OutputFormat::Text => Box::new(TextReport::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonLinesReport::new(io::stdout())),
    };

    Ok(pipeline.run(targets, sink.as_mut()).await)
}
