//! Pride Tracker — Binary Entrypoint
//!
//! One-shot by default (run it from cron); set `TRACKER_INTERVAL_SECS` to
//! keep the process alive and re-run on a fixed interval instead.

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pride_tracker::pipeline::Pipeline;
use pride_tracker::config::TrackerConfig;
use pride_tracker::sources::{
    bing_news::BingNewsFetcher, google_news::GoogleNewsFetcher, SourceFetcher,
};

const ENV_INTERVAL: &str = "TRACKER_INTERVAL_SECS";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere. Enables TRACKER_CONFIG_PATH
    // and TRACKER_INTERVAL_SECS overrides.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = TrackerConfig::load()?;
    info!(
        state = %cfg.paths.state.display(),
        feed = %cfg.paths.feed.display(),
        max_queries = cfg.limits.max_queries_per_run,
        "tracker starting"
    );

    let fetchers: Vec<Box<dyn SourceFetcher>> = vec![
        Box::new(GoogleNewsFetcher::new()),
        Box::new(BingNewsFetcher::new()),
    ];
    let pipeline = Pipeline::new(cfg, fetchers)?;

    let interval_secs = std::env::var(ENV_INTERVAL)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&v| v > 0);

    match interval_secs {
        None => {
            let report = pipeline.run_once().await?;
            info!(kept = report.kept, feed_len = report.feed_len, "one-shot run finished");
        }
        Some(secs) => {
            info!(interval_secs = secs, "interval mode");
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                // Keep ticking on failures; every run re-reads and rewrites
                // its own state and feed files.
                if let Err(e) = pipeline.run_once().await {
                    error!(error = %e, "run failed");
                }
            }
        }
    }

    Ok(())
}
