use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::{Error, StorageError};
use crate::model::{CacheResult, FeedImage};

use super::{Completion, FeedStore};

/// In-memory feed store backed by `Arc<Mutex<Option<..>>>`.
///
/// Clone-friendly (cloning shares the same slot). Each operation runs under
/// the lock at call time, so completions resolve immediately and in order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedStore {
    slot: Arc<Mutex<Option<(Vec<FeedImage>, DateTime<Utc>)>>>,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedStore for InMemoryFeedStore {
    fn retrieve(&self) -> Completion<CacheResult> {
        let result = self
            .slot
            .lock()
            .map_err(|_| Error::Retrieval(StorageError::LockPoisoned("retrieve")))
            .map(|slot| match slot.as_ref() {
                Some((feed, timestamp)) => CacheResult::Found { feed: feed.clone(), timestamp: *timestamp },
                None => CacheResult::Empty,
            });
        Completion::ready(result, Error::Retrieval)
    }

    fn insert(&self, feed: Vec<FeedImage>, timestamp: DateTime<Utc>) -> Completion<()> {
        let result = self
            .slot
            .lock()
            .map_err(|_| Error::Insertion(StorageError::LockPoisoned("insert")))
            .map(|mut slot| {
                *slot = Some((feed, timestamp));
            });
        Completion::ready(result, Error::Insertion)
    }

    fn delete(&self) -> Completion<()> {
        let result = self
            .slot
            .lock()
            .map_err(|_| Error::Deletion(StorageError::LockPoisoned("delete")))
            .map(|mut slot| {
                slot.take();
            });
        Completion::ready(result, Error::Deletion)
    }
}
