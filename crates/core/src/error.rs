//! Unified error types for feed-store.
//!
//! Every operation reports its failure kind through [`Error`]; the underlying
//! cause is always a [`StorageError`].

use tokio_rusqlite::rusqlite;

/// Low-level failure raised while touching the backing storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Persisted data could not be mapped back into a snapshot.
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    /// Migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// The database was written by a newer schema than this build knows.
    #[error("unsupported schema version {found} (latest known is {latest})")]
    UnsupportedSchema { found: i64, latest: i64 },

    /// An in-memory store's lock was poisoned by a panicking writer.
    #[error("lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// The store worker has shut down and no longer accepts commands.
    #[error("store is closed")]
    Closed,
}

/// Errors reported by a feed store, one variant per operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The store could not be opened or migrated.
    #[error("LOAD_FAILED: {0}")]
    Load(#[source] StorageError),

    /// `retrieve` could not read a consistent snapshot.
    #[error("RETRIEVAL_FAILED: {0}")]
    Retrieval(#[source] StorageError),

    /// `insert` could not commit the new snapshot.
    #[error("INSERTION_FAILED: {0}")]
    Insertion(#[source] StorageError),

    /// `delete` could not remove the snapshot.
    #[error("DELETION_FAILED: {0}")]
    Deletion(#[source] StorageError),
}

impl Error {
    /// The storage failure behind this error.
    pub fn storage(&self) -> &StorageError {
        match self {
            Error::Load(e) | Error::Retrieval(e) | Error::Insertion(e) | Error::Deletion(e) => e,
        }
    }

    /// Whether the failure came from a store that has already shut down.
    pub fn is_closed(&self) -> bool {
        matches!(self.storage(), StorageError::Closed)
    }
}

impl From<tokio_rusqlite::Error<StorageError>> for StorageError {
    fn from(err: tokio_rusqlite::Error<StorageError>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => StorageError::Closed,
            tokio_rusqlite::Error::Close(c) => StorageError::Database(tokio_rusqlite::Error::Close(c)),
            _ => StorageError::Closed,
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for StorageError {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::ConnectionClosed => StorageError::Closed,
            other => StorageError::Database(other),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Retrieval(StorageError::Malformed("missing timestamp".to_string()));
        assert!(err.to_string().contains("RETRIEVAL_FAILED"));
        assert!(err.to_string().contains("missing timestamp"));
    }

    #[test]
    fn test_error_source_chain() {
        let err = Error::Insertion(StorageError::Closed);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "store is closed");
        assert!(err.is_closed());
    }

    #[test]
    fn test_rusqlite_error_maps_to_database() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::Database(_)));
    }

    #[test]
    fn test_connection_closed_maps_to_closed() {
        let err: StorageError = tokio_rusqlite::Error::<rusqlite::Error>::ConnectionClosed.into();
        assert!(matches!(err, StorageError::Closed));
    }
}
