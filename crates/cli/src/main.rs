//! feed-store command line entry point.
//!
//! Opens the cache database named by configuration (or `--db`) and runs one
//! store operation against it. Logging goes to stderr so stdout stays JSON.

use anyhow::{Context, Result};
use clap::Parser;
use feedstore_core::{CacheStore, StoreConfig};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let mut cli = Cli::parse();

    let mut config = StoreConfig::load().context("loading feed store configuration")?;
    if let Some(db) = cli.db.take() {
        config.db_path = db;
    }

    tracing::info!(path = %config.db_path.display(), "opening feed store");
    let store = CacheStore::open_with_config(&config)
        .await
        .with_context(|| format!("opening {}", config.db_path.display()))?;

    let mut stdout = std::io::stdout().lock();
    let outcome = cli.command.run(&store, &mut stdout).await;

    store.close().await.context("closing feed store")?;
    outcome
}
