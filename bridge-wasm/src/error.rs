//! Error types for the content side of the bridge

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for content-side bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur on the content side of the bridge
#[derive(Error, Debug)]
pub enum WasmError {
    /// No browser window in this execution context
    #[error("No window object available")]
    NoWindow,

    /// The transport shim is missing or incomplete
    #[error("Bridge not installed: {0}")]
    NotInstalled(String),

    /// The host rejected the request; carries the host's text
    #[error("Host rejected the request: {0}")]
    Rejected(String),

    /// JavaScript error from the runtime
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Value could not cross between Rust and JavaScript
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::JavaScript(js_message(&js_value))
    }
}

impl From<serde_wasm_bindgen::Error> for WasmError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        WasmError::Conversion(err.to_string())
    }
}

/// Text of a thrown JavaScript value.
pub(crate) fn js_message(js_value: &JsValue) -> String {
    if let Some(text) = js_value.as_string() {
        text
    } else if let Some(error) = js_value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else {
        format!("{:?}", js_value)
    }
}
