//! Content Side of the Web Native Bridge
//!
//! For content applications compiled to WebAssembly and loaded into a view
//! hosted by `core-bridge`. The host installs `window.<bridge>` before any
//! content code runs; this crate wraps it:
//!
//! - [`ContentBridge::send_to_native`]: content -> host request, awaiting the
//!   host handler's reply
//! - [`ContentBridge::set_responder`]: answer host -> content calls; the
//!   returned [`ResponderGuard`] unassigns the responder on drop
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It will not compile for native targets.
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::ContentBridge;
//! use core_runtime::config::BridgeConfig;
//! use serde_json::json;
//!
//! let bridge = ContentBridge::connect(&BridgeConfig::default())?;
//! let reply = bridge.send_to_native(&json!({ "type": "ping" })).await?;
//!
//! let _responder = bridge.set_responder(|data| async move {
//!     Ok(Some(json!({ "received": data })))
//! })?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod error;
pub mod responder;
pub mod transport;

pub use error::{WasmError, WasmResult};
pub use responder::ResponderGuard;
pub use transport::ContentBridge;

/// Route Rust panics to the browser console.
pub fn install_panic_hook() {
    console_error_panic_hook::set_once();
}
