//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the web ⇄ native bridge:
//! - Configuration (bridge names, payload limits, host options)
//! - Logging and tracing infrastructure
//! - Lifecycle event bus
//!
//! ## Overview
//!
//! Nothing in this crate speaks the bridging protocol. It holds the pieces
//! both halves of the bridge share (the configured global names live here so
//! the `wasm32` content side and the native host agree on them) and the
//! ambient plumbing the protocol crate logs and reports through.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{BridgeConfig, HostConfig, PayloadLimits};
pub use error::{Error, Result};
