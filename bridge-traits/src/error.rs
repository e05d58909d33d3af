use thiserror::Error;

/// Failures reported by a host platform's content-view capabilities.
///
/// These describe the evaluation and message-passing primitives themselves,
/// not the outcome of a bridged call. The protocol layer maps them onto its
/// own error taxonomy before anything reaches a caller.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The evaluated script threw. `message` is the exception text as
    /// reported by the content engine.
    #[error("Script exception: {message}")]
    ScriptException { message: String },

    /// The content context is gone (view torn down, process crashed, page
    /// navigated away mid-call).
    #[error("Content context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn script_exception(message: impl Into<String>) -> Self {
        Self::ScriptException {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
