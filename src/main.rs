use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod crawler;
mod export;
mod extract;
mod fetcher;
mod keywords;
mod location;
mod models;
mod sheets;
mod sites;

use app::ScraperApp;
use cli::Cli;
use config::load_config_or_default;
use models::Result;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (config, config_warning) = load_config_or_default("config.yml").await;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ecw_broker_scraper={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(message) = config_warning {
        warn!("{}", message);
    }

    tokio::fs::create_dir_all(&config.output.directory).await?;

    // Ctrl+C sets the flag; the crawl loops stop at the next boundary and
    // whatever was collected still gets deduped, written, and uploaded.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, flushing collected contacts before exit...");
                shutdown.store(true, Ordering::SeqCst);
            }
        });
    }

    let app = ScraperApp::new(config, shutdown)?;
    app.run(cli).await
}
