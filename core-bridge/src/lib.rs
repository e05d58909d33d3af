//! # Core Bridge
//!
//! Host side of the request/response bridge between a native application and
//! an embedded web content view.
//!
//! ## Overview
//!
//! The two sides share no memory. Content reaches the host through a
//! message channel whose handler replies exactly once; the host reaches
//! content by evaluating a script and awaiting its result. This crate turns
//! those two primitives into a symmetric call surface:
//!
//! - [`script`] - the transport shim installed into content and the
//!   evaluated responder call
//! - [`router::RequestRouter`] - dispatches content -> host requests to the
//!   single [`handler::RequestHandler`]
//! - [`outbound::OutboundCaller`] - host -> content calls, mapping an
//!   unassigned responder to [`Error::NoHandlerRegistered`]
//! - [`correlator::CallCorrelator`] - settles in-flight calls when the view
//!   goes away
//! - [`BridgeHandle`] - the caller-facing `send_to_content`, `reload`,
//!   `current_location`
//! - [`WebNativeBridge`] - wires all of the above into one content view
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_bridge::{handler::handler_fn, BridgeHandle, WebNativeBridge};
//! use core_runtime::config::HostConfig;
//! use serde_json::json;
//!
//! let handle = BridgeHandle::new();
//! let bridge = WebNativeBridge::new(
//!     HostConfig::builder().initial_address("https://app.local/").build()?,
//!     Some(handler_fn(|request| async move { Ok(Some(json!({ "echo": request }))) })),
//!     handle.clone(),
//! )?;
//!
//! bridge.attach(content_view)?;
//!
//! let response = handle.send_to_content(json!({ "type": "actionA" })).await?;
//! ```
//!
//! ## Error Handling
//!
//! Failures crossing the boundary travel as text only. Locally they surface
//! as [`Error`]; nothing is retried. Using a handle that is not bound is not
//! an error and resolves to a safe default.

pub mod bridge;
pub mod correlator;
pub mod error;
pub mod handle;
pub mod handler;
pub mod outbound;
pub mod payload;
pub mod router;
pub mod script;

pub use bridge::WebNativeBridge;
pub use error::{Error, Result};
pub use handle::{BridgeHandle, LifecycleState};
pub use handler::{handler_fn, typed_handler_fn, RequestHandler};
pub use payload::PayloadError;
