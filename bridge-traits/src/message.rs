//! Inbound Messages and Reply Continuations
//!
//! Content reaches the host through a reply-capable `postMessage`. The
//! platform hands each message to a [`MessageSink`] together with a [`Reply`]
//! continuation; resolving that continuation settles the promise the content
//! side is awaiting.
//!
//! A [`Reply`] resolves exactly once by construction:
//! - [`Reply::resolve`] takes `self`, so a second resolution does not compile
//! - dropping an unresolved reply resolves it with an error, so a sink that
//!   bails out (or panics) never leaves the content side hanging

use std::fmt;

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platform::PlatformSendSync;

/// Error text sent when a reply is dropped without being resolved.
pub const DROPPED_REPLY_MESSAGE: &str = "request was dropped before a reply was produced";

/// A raw message posted by the content side.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Decoded payload, passed through to the handler unmodified.
    pub body: Value,
    /// Whether the message came from the top-level frame.
    pub is_main_frame: bool,
    /// Security origin of the posting document, when the platform reports it.
    pub origin: Option<String>,
}

impl InboundMessage {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            is_main_frame: true,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn from_subframe(mut self) -> Self {
        self.is_main_frame = false;
        self
    }
}

/// How an inbound message was settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ReplyOutcome {
    /// Resolve the content-side promise with this value.
    Value(Value),
    /// Resolve with the explicit "no content" marker (`null` on the wire).
    NoContent,
    /// Reject the content-side promise with this text.
    Error(String),
}

impl ReplyOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

type ReplyFn = Box<dyn FnOnce(ReplyOutcome) + Send>;

/// Single-use continuation that settles one inbound message.
pub struct Reply {
    respond: Option<ReplyFn>,
}

impl Reply {
    /// Wrap the platform's native reply callback.
    pub fn new<F>(respond: F) -> Self
    where
        F: FnOnce(ReplyOutcome) + Send + 'static,
    {
        Self {
            respond: Some(Box::new(respond)),
        }
    }

    /// Reply whose outcome is delivered to the returned receiver.
    ///
    /// Useful for platforms whose reply primitive is itself asynchronous, and
    /// for tests.
    pub fn channel() -> (Self, oneshot::Receiver<ReplyOutcome>) {
        let (tx, rx) = oneshot::channel();
        let reply = Self::new(move |outcome| {
            // Receiver gone means the content side stopped listening.
            let _ = tx.send(outcome);
        });
        (reply, rx)
    }

    pub fn resolve(mut self, outcome: ReplyOutcome) {
        if let Some(respond) = self.respond.take() {
            respond(outcome);
        }
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        if let Some(respond) = self.respond.take() {
            respond(ReplyOutcome::Error(DROPPED_REPLY_MESSAGE.to_string()));
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reply")
            .field("pending", &self.respond.is_some())
            .finish()
    }
}

/// Receives messages posted through the injected transport.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait MessageSink: PlatformSendSync {
    async fn on_message(&self, message: InboundMessage, reply: Reply);
}
