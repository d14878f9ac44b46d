//! Caller-visible handle for an open subscription stream.

use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::decode;
use crate::error::Result;
use crate::websocket::connection::Command;

/// A live stream of decoded server-push results.
///
/// Items arrive in server emission order for this operation; no ordering
/// holds across different operations. Delivery is at-most-once: after a
/// transport drop the subscription is replayed on the next connection and
/// resumes from "now"; updates emitted while the transport was down are
/// not replayed.
///
/// The stream ends when the server completes the operation, and yields a
/// final error item first when the operation fails terminally. Dropping the
/// handle (or calling [`stop`](Subscription::stop)) cancels the
/// subscription and notifies the server.
pub struct Subscription<T> {
    id: String,
    items: mpsc::Receiver<Result<Value>>,
    commands: mpsc::Sender<Command>,
    root: Option<String>,
    stopped: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(
        id: String,
        items: mpsc::Receiver<Result<Value>>,
        commands: mpsc::Sender<Command>,
        root: Option<String>,
    ) -> Self {
        Self {
            id,
            items,
            commands,
            root,
            stopped: false,
            _marker: PhantomData,
        }
    }

    /// The operation id this stream is registered under
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Cancel the subscription.
    ///
    /// Idempotent. The registry entry is freed immediately; a late frame
    /// already in flight for this id is dropped by the connection.
    pub async fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            let _ = self
                .commands
                .send(Command::Stop {
                    id: self.id.clone(),
                })
                .await;
            self.items.close();
        }
    }
}

impl<T: DeserializeOwned> Stream for Subscription<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.items.poll_recv(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(Some(
                item.and_then(|value| decode::value_at(value, this.root.as_deref())),
            )),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if !self.stopped {
            let _ = self.commands.try_send(Command::Stop {
                id: self.id.clone(),
            });
        }
    }
}
