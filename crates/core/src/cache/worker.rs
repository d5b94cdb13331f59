//! The serial command loop that owns the database connection.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio_rusqlite::Connection;

use super::snapshot;
use crate::error::{Error, StorageError};
use crate::model::{CacheResult, FeedImage};
use crate::store::Responder;

/// A queued store operation and where to deliver its result.
#[derive(Debug)]
pub(crate) enum Command {
    Retrieve(Responder<CacheResult>),
    Insert { feed: Vec<FeedImage>, timestamp: DateTime<Utc>, responder: Responder<()> },
    Delete(Responder<()>),
    Close(oneshot::Sender<Result<(), StorageError>>),
}

/// Execute commands one at a time, in the order they were queued.
///
/// Each command's database work finishes before the next one is taken, so at
/// most one operation touches the connection at any instant.
pub(crate) async fn run(conn: Connection, mut commands: mpsc::UnboundedReceiver<Command>) {
    tracing::debug!("feed store worker started");

    while let Some(command) = commands.recv().await {
        match command {
            Command::Retrieve(responder) => {
                tracing::trace!("retrieve");
                responder.respond(snapshot::load(&conn).await.map_err(Error::Retrieval));
            }
            Command::Insert { feed, timestamp, responder } => {
                tracing::trace!(images = feed.len(), %timestamp, "insert");
                responder.respond(snapshot::replace(&conn, feed, timestamp).await.map_err(Error::Insertion));
            }
            Command::Delete(responder) => {
                tracing::trace!("delete");
                responder.respond(snapshot::clear(&conn).await.map_err(Error::Deletion));
            }
            Command::Close(reply) => {
                // Anything queued behind the close is dropped and resolves as closed.
                drop(commands);
                let result = conn.close().await.map_err(StorageError::from);
                tracing::debug!("feed store worker closed");
                let _ = reply.send(result);
                return;
            }
        }
    }

    tracing::debug!("feed store worker stopped: all handles dropped");
}
