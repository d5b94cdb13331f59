//! Subcommands and their implementations.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use feedstore_core::{FeedImage, FeedStore};

#[derive(Parser, Debug)]
#[command(name = "feed-store")]
#[command(about = "Inspect or seed the local feed cache")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Cache database path (overrides FEED_STORE_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the cached snapshot as JSON
    Retrieve,

    /// Replace the cached snapshot with a feed read from a JSON file
    Insert {
        /// JSON array of feed images
        #[arg(short, long)]
        file: PathBuf,

        /// Capture time in RFC 3339 (defaults to now)
        #[arg(short, long)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// Remove the cached snapshot
    Delete,
}

impl Command {
    pub async fn run<S: FeedStore>(self, store: &S, out: &mut impl Write) -> Result<()> {
        match self {
            Command::Retrieve => retrieve(store, out).await,
            Command::Insert { file, timestamp } => insert(store, &file, timestamp.unwrap_or_else(Utc::now)).await,
            Command::Delete => {
                store.delete().await?;
                tracing::info!("deleted cached feed");
                Ok(())
            }
        }
    }
}

async fn retrieve<S: FeedStore>(store: &S, out: &mut impl Write) -> Result<()> {
    let result = store.retrieve().await?;
    let json = serde_json::to_string_pretty(&result).context("serializing snapshot")?;
    writeln!(out, "{json}")?;
    Ok(())
}

async fn insert<S: FeedStore>(store: &S, file: &Path, timestamp: DateTime<Utc>) -> Result<()> {
    let raw = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let feed: Vec<FeedImage> =
        serde_json::from_str(&raw).with_context(|| format!("parsing feed images from {}", file.display()))?;

    let images = feed.len();
    store.insert(feed, timestamp).await?;
    tracing::info!(images, %timestamp, "inserted cached feed");
    Ok(())
}
