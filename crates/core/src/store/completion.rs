//! Single-shot completion handle returned by every store operation.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{Error, StorageError};

/// Resolves exactly once with the result of an already-enqueued operation.
///
/// The work is submitted when the operation is called; awaiting (or dropping)
/// the completion does not affect when or whether it runs.
#[must_use = "the operation runs regardless, but its result is lost unless awaited"]
#[derive(Debug)]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T, Error>>,
    on_closed: fn(StorageError) -> Error,
}

/// Sending half held by whoever performs the operation.
#[derive(Debug)]
pub(crate) struct Responder<T> {
    tx: oneshot::Sender<Result<T, Error>>,
}

impl<T> Completion<T> {
    /// Create a linked responder/completion pair.
    ///
    /// `on_closed` wraps [`StorageError::Closed`] if the responder is dropped
    /// without answering.
    pub(crate) fn channel(on_closed: fn(StorageError) -> Error) -> (Responder<T>, Self) {
        let (tx, rx) = oneshot::channel();
        (Responder { tx }, Self { rx, on_closed })
    }

    /// A completion that is already resolved.
    pub(crate) fn ready(result: Result<T, Error>, on_closed: fn(StorageError) -> Error) -> Self {
        let (responder, completion) = Self::channel(on_closed);
        responder.respond(result);
        completion
    }
}

impl<T> Responder<T> {
    /// Deliver the result. A caller that dropped its completion is ignored.
    pub(crate) fn respond(self, result: Result<T, Error>) {
        let _ = self.tx.send(result);
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let on_closed = self.on_closed;
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(on_closed(StorageError::Closed))),
            Poll::Pending => Poll::Pending,
        }
    }
}
