//! The feed store seam shared by every backing implementation.
//!
//! A store holds zero or one cached feed snapshot. Operations are submitted
//! the moment they are called and take effect in submission order; callers
//! observe the outcome through the returned [`Completion`].

mod completion;
pub mod memory;

#[cfg(test)]
pub(crate) mod specs;

use chrono::{DateTime, Utc};

use crate::model::{CacheResult, FeedImage};

pub use completion::Completion;
pub(crate) use completion::Responder;
pub use memory::InMemoryFeedStore;

/// Durable holder of the single cached feed snapshot.
pub trait FeedStore: Send + Sync {
    /// Read the current snapshot, if any. Never mutates storage.
    fn retrieve(&self) -> Completion<CacheResult>;

    /// Replace any existing snapshot with `feed` captured at `timestamp`.
    fn insert(&self, feed: Vec<FeedImage>, timestamp: DateTime<Utc>) -> Completion<()>;

    /// Remove the snapshot. Succeeds when the cache is already empty.
    fn delete(&self) -> Completion<()>;
}
