use page_digest::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = Config::load()?;
    info!(targets = %config.targets.display(), workers = config.workers, "configuration loaded");

    let stats = page_digest::run(config).await?;
    info!(total = stats.total, failed = stats.failed, "done");

    Ok(())
}
