//! Bounded-concurrency fetch, extract, rank and summarize pipeline.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::{AnalysisSettings, MAX_THREADS};
use crate::error::Result;
use crate::frequency::rank_words;
use crate::models::{Outcome, PageAnalysis, PageResult, Stage};
use crate::report::ResultSink;
use crate::scraper::{Fetcher, extract_text};
use crate::stopwords::StopwordSet;
use crate::summarizer::summarize;

/// Tally of one run, handed to the sink once every page is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunStats {
    fn record(&mut self, result: &PageResult) {
        self.total += 1;
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Runs every page through fetch and analysis with at most `workers` pages
/// in flight, clamped to `1..=MAX_THREADS`. Cloning is cheap; clones share
/// the client and stopwords.
#[derive(Debug, Clone)]
pub struct Pipeline {
    fetcher: Arc<Fetcher>,
    stopwords: Arc<StopwordSet>,
    settings: AnalysisSettings,
    workers: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: Fetcher,
        stopwords: StopwordSet,
        settings: AnalysisSettings,
        workers: usize,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            stopwords: Arc::new(stopwords),
            settings,
            workers: workers.clamp(1, MAX_THREADS),
        }
    }

    /// Processes `urls` and feeds one result per address to `sink` as each
    /// page finishes. Returns once every page has been reported and the
    /// sink has been told the run is over.
    pub async fn run<S>(&self, urls: Vec<String>, sink: &mut S) -> RunStats
    where
        S: ResultSink + ?Sized,
    {
        let submitted = urls.len();
        let start = Instant::now();
        info!(pages = submitted, workers = self.workers, "starting pipeline");

        let (tx, mut rx) = mpsc::channel(self.workers * 2);
        let dispatcher = tokio::spawn(self.clone().dispatch(urls, tx));

        let mut stats = RunStats::default();
        // Closes once the dispatcher and every worker have dropped their senders.
        // Sinks write synchronously on this task; a report line is small and
        // workers keep running because their slot is already released.
        while let Some(result) = rx.recv().await {
            stats.record(&result);
            if let Err(e) = sink.accept(result) {
                error!(error = %e, "failed to report page result");
            }
        }

        if let Err(e) = dispatcher.await {
            error!(error = %e, "dispatcher task failed");
        }
        if stats.total != submitted {
            error!(submitted, reported = stats.total, "some pages produced no result");
        }
        if let Err(e) = sink.finish(&stats) {
            error!(error = %e, "failed to finish report");
        }

        info!(
            total = stats.total,
            succeeded = stats.succeeded,
            failed = stats.failed,
            elapsed = ?start.elapsed(),
            "pipeline finished"
        );
        stats
    }

    async fn dispatch(self, urls: Vec<String>, results: mpsc::Sender<PageResult>) {
        let slots = Arc::new(Semaphore::new(self.workers));
        let mut workers = JoinSet::new();

        for url in urls {
            // Acquired before spawning so pages start in input order.
            let permit = Arc::clone(&slots)
                .acquire_owned()
                .await
                .expect("worker slots are never closed");
            let pipeline = self.clone();
            let results = results.clone();

            workers.spawn(async move {
                let result = pipeline.process(url).await;
                drop(permit);
                if results.send(result).await.is_err() {
                    warn!("result receiver closed before page was reported");
                }
            });
        }
        drop(results);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "worker task failed");
            }
        }
        debug!("all workers finished");
    }

    async fn process(&self, url: String) -> PageResult {
        let start = Instant::now();
        debug!(url = %url, "fetching page");

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(err) => return log_outcome(PageResult::from_error(url, &err), start),
        };

        let stopwords = Arc::clone(&self.stopwords);
        let settings = self.settings;
        let analysis =
            tokio::task::spawn_blocking(move || analyze_page(&html, &stopwords, settings)).await;

        let result = match analysis {
            Ok(Ok(analysis)) => PageResult::success(url, analysis),
            Ok(Err(err)) => PageResult::from_error(url, &err),
            Err(err) => PageResult::failed(url, Stage::Analyzing, err),
        };
        log_outcome(result, start)
    }
}

/// Extracts the page text once and derives both the ranked words and the
/// summary from it.
pub fn analyze_page(
    html: &str,
    stopwords: &StopwordSet,
    settings: AnalysisSettings,
) -> Result<PageAnalysis> {
    let text = extract_text(html)?;
    let top_words = rank_words(&text, stopwords, settings.top_words);
    let summary = summarize(&text, settings.summary_sentences)?;

    Ok(PageAnalysis {
        word_count: text.split_whitespace().count(),
        top_words,
        summary,
    })
}

fn log_outcome(result: PageResult, start: Instant) -> PageResult {
    match &result.outcome {
        Outcome::Success(analysis) => info!(
            url = %result.url,
            words = analysis.word_count,
            sentences = analysis.summary.len(),
            elapsed = ?start.elapsed(),
            "page analyzed"
        ),
        Outcome::Failed { stage, reason } => warn!(
            url = %result.url,
            stage = %stage,
            elapsed = ?start.elapsed(),
            "page failed: {}",
            reason
        ),
    }
    result
}
