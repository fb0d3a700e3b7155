use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::{AppError, Result};

/// Upper bound on concurrently processed pages.
pub const MAX_THREADS: usize = 1024;

/// Command-line interface. Every flag can also be supplied through the
/// environment or a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "page-digest",
    about = "Fetch pages, rank their most common words and summarize them"
)]
pub struct Cli {
    /// Targets file (one page address per line)
    #[arg(short = 't', long, env = "PAGE_DIGEST_TARGETS")]
    pub targets: Option<PathBuf>,

    /// Exclude file (one word per line)
    #[arg(short = 'e', long, env = "PAGE_DIGEST_EXCLUDE")]
    pub exclude: Option<PathBuf>,

    /// Number of most common words to output
    #[arg(short = 'n', long, env = "PAGE_DIGEST_TOP_WORDS", default_value_t = 10)]
    pub top_words: usize,

    /// Number of pages processed concurrently
    #[arg(long, env = "PAGE_DIGEST_THREADS", default_value_t = 10)]
    pub threads: usize,

    /// Number of sentences in each summary
    #[arg(
        short = 's',
        long,
        env = "PAGE_DIGEST_SUMMARY_SENTENCES",
        default_value_t = 3
    )]
    pub summary_sentences: usize,

    /// Seconds allowed for a single page request
    #[arg(long, env = "PAGE_DIGEST_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Seconds allowed to establish a connection
    #[arg(long, env = "PAGE_DIGEST_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub connect_timeout_secs: u64,

    /// Report format written to stdout
    #[arg(long, value_enum, env = "PAGE_DIGEST_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks, one per page.
    Text,
    /// One JSON object per line.
    Json,
}

/// Per-page analysis knobs, copied into every worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub top_words: usize,
    pub summary_sentences: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_words: 10,
            summary_sentences: 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub targets: PathBuf,
    pub exclude: Option<PathBuf>,
    pub workers: usize,
    pub analysis: AnalysisSettings,
    pub fetch: FetchSettings,
    pub format: OutputFormat,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_cli(Cli::parse())
    }

    /// Validates parsed arguments. Nothing is read from disk and no request
    /// is made until this succeeds.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let targets = cli
            .targets
            .ok_or_else(|| AppError::ConfigError("Missing -t or --targets flag".to_string()))?;

        if cli.summary_sentences < 1 {
            return Err(AppError::ConfigError(format!(
                "summary sentences must be at least 1, got {}",
                cli.summary_sentences
            )));
        }
        if cli.top_words < 1 {
            return Err(AppError::ConfigError(format!(
                "top word count must be at least 1, got {}",
                cli.top_words
            )));
        }
        if cli.threads < 1 || cli.threads > MAX_THREADS {
            return Err(AppError::ConfigError(format!(
                "thread count must be between 1 and {}, got {}",
                MAX_THREADS, cli.threads
            )));
        }
        if cli.timeout_secs == 0 || cli.connect_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "timeouts must be at least one second".to_string(),
            ));
        }

        Ok(Config {
            targets,
            exclude: cli.exclude,
            workers: cli.threads,
            analysis: AnalysisSettings {
                top_words: cli.top_words,
                summary_sentences: cli.summary_sentences,
            },
            fetch: FetchSettings {
                timeout: Duration::from_secs(cli.timeout_secs),
                connect_timeout: Duration::from_secs(cli.connect_timeout_secs),
            },
            format: cli.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let cli = Cli::try_parse_from(std::iter::once("page-digest").chain(args.iter().copied()))
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Config::from_cli(cli)
    }

    #[test]
    fn defaults_apply() {
        let config = parse(&["-t", "urls.txt"]).unwrap();
        assert_eq!(config.targets, PathBuf::from("urls.txt"));
        assert_eq!(config.exclude, None);
        assert_eq!(config.workers, 10);
        assert_eq!(config.analysis, AnalysisSettings::default());
        assert_eq!(config.fetch, FetchSettings::default());
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--targets",
            "urls.txt",
            "-e",
            "stop.txt",
            "-n",
            "5",
            "--threads",
            "50",
            "-s",
            "1",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.exclude, Some(PathBuf::from("stop.txt")));
        assert_eq!(config.workers, 50);
        assert_eq!(config.analysis.top_words, 5);
        assert_eq!(config.analysis.summary_sentences, 1);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn zero_summary_sentences_is_rejected() {
        let err = parse(&["-t", "urls.txt", "-s", "0"]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("summary sentences")));
    }

    #[test]
    fn zero_top_words_and_threads_are_rejected() {
        assert!(matches!(
            parse(&["-t", "urls.txt", "-n", "0"]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            parse(&["-t", "urls.txt", "--threads", "0"]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn thread_count_is_capped() {
        let max = MAX_THREADS.to_string();
        assert_eq!(parse(&["-t", "urls.txt", "--threads", &max]).unwrap().workers, MAX_THREADS);

        let above = (MAX_THREADS + 1).to_string();
        assert!(matches!(
            parse(&["-t", "urls.txt", "--threads", &above]),
            Err(AppError::ConfigError(msg)) if msg.contains("thread count")
        ));
        assert!(matches!(
            parse(&["-t", "urls.txt", "--threads", "3000000000000000000"]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn missing_targets_is_a_config_error() {
        let cli = Cli {
            targets: None,
            exclude: None,
            top_words: 10,
            threads: 10,
            summary_sentences: 3,
            timeout_secs: 10,
            connect_timeout_secs: 5,
            format: OutputFormat::Text,
        };
        let err = Config::from_cli(cli).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("targets")));
    }
}
