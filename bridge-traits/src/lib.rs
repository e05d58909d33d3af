//! # Host Bridge Traits
//!
//! Capability traits a host platform implements so the web ⇄ native bridge
//! can run on top of its content view.
//!
//! ## Overview
//!
//! The bridge protocol never touches a rendering engine directly. Everything
//! it needs from the hosting UI surface is expressed here:
//!
//! ### Content View
//! - [`ScriptEvaluator`](content::ScriptEvaluator) - Evaluate an async function body with named arguments and await its result
//! - [`ScriptInjector`](content::ScriptInjector) - Install document-start user scripts and reply-capable message handlers
//! - [`ContentNavigator`](content::ContentNavigator) - Load an address, read the current one
//! - [`ContentView`](content::ContentView) - All of the above, blanket-implemented
//!
//! ### Messaging
//! - [`MessageSink`](message::MessageSink) - Receives messages posted by content
//! - [`Reply`](message::Reply) - Exactly-once continuation settling one message
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Evaluate-with-reply | Message handler with reply |
//! |----------|---------------------|----------------------------|
//! | Apple    | `callAsyncJavaScript` | `WKScriptMessageHandlerWithReply` |
//! | Windows  | `ExecuteScriptAsync` | `WebMessageReceived` + correlation |
//! | Linux    | `evaluate_javascript` | `script-message-with-reply-received` |
//!
//! ## Error Handling
//!
//! Capability failures are reported as [`BridgeError`](error::BridgeError).
//! The protocol crate maps them onto its own taxonomy (no handler registered,
//! transport failure, ...) before anything reaches a caller.
//!
//! ## Thread Safety
//!
//! On native targets every capability trait requires `Send + Sync`. Content
//! views are usually UI-thread affine; implementations are expected to hop to
//! the owning thread internally.

pub mod content;
pub mod error;
pub mod logging;
pub mod message;
pub mod platform;

pub use error::BridgeError;

pub use content::{
    ContentNavigator, ContentView, ContentWorld, InjectionTime, ScriptArguments,
    ScriptEvaluator, ScriptInjector, UserScript,
};
pub use logging::{LogEntry, LogLevel, LoggerSink, MemoryLogger};
pub use message::{InboundMessage, MessageSink, Reply, ReplyOutcome};
