use bridge_traits::BridgeError;
use thiserror::Error;

use crate::payload::PayloadError;

/// Errors surfaced by bridge operations on the host side.
#[derive(Error, Debug)]
pub enum Error {
    /// The registered request handler failed. Only its text ever reaches the
    /// content side.
    #[error("Handler failed: {0}")]
    Handler(String),

    /// The content side never assigned its responder entry.
    #[error("No handler registered on the content side: `{entry}` is not assigned")]
    NoHandlerRegistered { entry: String },

    /// The content responder threw or rejected.
    #[error("Content responder rejected the call: {0}")]
    ContentRejected(String),

    /// The evaluation or message-passing primitive itself failed.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Payload rejected: {0}")]
    Payload(#[from] PayloadError),

    #[error("Bridge handle is already bound to a content view")]
    AlreadyBound,

    #[error("Bridge handle was destroyed; create a new bridge for a new content view")]
    Destroyed,

    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),
}

impl From<BridgeError> for Error {
    fn from(err: BridgeError) -> Self {
        Error::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
