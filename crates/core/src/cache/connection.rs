//! Store handle, connection setup and pragma configuration.
//!
//! Opening a store applies the required pragmas, runs migrations and starts
//! the single worker that owns the connection from then on.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio_rusqlite::Connection;

use super::migrations;
use super::worker::{self, Command};
use crate::config::StoreConfig;
use crate::error::{Error, StorageError};
use crate::model::{CacheResult, FeedImage};
use crate::store::{Completion, FeedStore, Responder};

/// SQLite-backed feed store.
///
/// Every operation is pushed onto one queue at call time and executed by a
/// single worker task against a tokio-rusqlite connection, so effects land
/// in submission order. Clones share the queue.
#[derive(Clone, Debug)]
pub struct CacheStore {
    queue: mpsc::UnboundedSender<Command>,
}

impl CacheStore {
    /// Open a store at the specified path with default settings.
    ///
    /// Creates the file if it doesn't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config = StoreConfig { db_path: path.as_ref().to_path_buf(), ..Default::default() };
        Self::open_with_config(&config).await
    }

    /// Open a store described by `config`.
    pub async fn open_with_config(config: &StoreConfig) -> Result<Self, Error> {
        let conn = Connection::open(&config.db_path)
            .await
            .map_err(|e| Error::Load(StorageError::Database(e.into())))?;

        let store = Self::prepare(conn, config).await?;
        tracing::debug!(path = %config.db_path.display(), "opened feed store");
        Ok(store)
    }

    /// Open a store backed by a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Load(StorageError::Database(e.into())))?;

        Self::prepare(conn, &StoreConfig::default()).await
    }

    /// Configure and migrate `conn`, then hand it to a fresh worker.
    pub(crate) async fn prepare(conn: Connection, config: &StoreConfig) -> Result<Self, Error> {
        let pragmas = pragmas(config);
        conn.call(move |conn| conn.execute_batch(&pragmas))
            .await
            .map_err(|e| Error::Load(e.into()))?;

        migrations::run(&conn).await.map_err(Error::Load)?;

        let (queue, commands) = mpsc::unbounded_channel();
        tokio::spawn(worker::run(conn, commands));
        Ok(Self { queue })
    }

    /// Stop the worker after every previously submitted operation finishes,
    /// then close the database.
    ///
    /// Operations submitted afterwards, from this or any cloned handle,
    /// resolve with a closed-store error.
    pub async fn close(self) -> Result<(), StorageError> {
        let (reply, closed) = oneshot::channel();
        if self.queue.send(Command::Close(reply)).is_err() {
            return Ok(());
        }
        closed.await.unwrap_or(Ok(()))
    }

    fn submit<T>(
        &self, on_closed: fn(StorageError) -> Error, command: impl FnOnce(Responder<T>) -> Command,
    ) -> Completion<T> {
        let (responder, completion) = Completion::channel(on_closed);
        // A send error drops the responder, which resolves the completion as closed.
        let _ = self.queue.send(command(responder));
        completion
    }
}

impl FeedStore for CacheStore {
    fn retrieve(&self) -> Completion<CacheResult> {
        self.submit(Error::Retrieval, Command::Retrieve)
    }

    fn insert(&self, feed: Vec<FeedImage>, timestamp: DateTime<Utc>) -> Completion<()> {
        self.submit(Error::Insertion, |responder| Command::Insert { feed, timestamp, responder })
    }

    fn delete(&self) -> Completion<()> {
        self.submit(Error::Deletion, Command::Delete)
    }
}

fn pragmas(config: &StoreConfig) -> String {
    let journal_mode = if config.wal { "WAL" } else { "DELETE" };
    format!(
        "PRAGMA journal_mode={journal_mode};
         PRAGMA synchronous=NORMAL;
         PRAGMA temp_store=MEMORY;
         PRAGMA foreign_keys=ON;
         PRAGMA busy_timeout={};",
        config.busy_timeout().as_millis()
    )
}
