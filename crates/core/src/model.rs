//! Feed values held by the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A single feed item as cached locally.
///
/// Order inside a feed is display order and is preserved by every store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedImage {
    pub id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImage {
    /// Create an image with no description or location.
    pub fn new(id: Uuid, url: Url) -> Self {
        Self { id, description: None, location: None, url }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Outcome of a successful `retrieve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheResult {
    /// No snapshot is persisted.
    Empty,
    /// The current snapshot.
    Found { feed: Vec<FeedImage>, timestamp: DateTime<Utc> },
}

impl CacheResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, CacheResult::Empty)
    }

    /// Split a found snapshot into its feed and timestamp.
    pub fn into_found(self) -> Option<(Vec<FeedImage>, DateTime<Utc>)> {
        match self {
            CacheResult::Empty => None,
            CacheResult::Found { feed, timestamp } => Some((feed, timestamp)),
        }
    }
}
