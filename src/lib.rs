//! Workspace facade crate.
//!
//! Host applications can depend on `web-native-bridge` alone and reach the
//! bridge assembly, its configuration, and the platform capability traits
//! without wiring each workspace crate individually.

pub use bridge_traits as traits;
pub use core_bridge::*;
pub use core_runtime::{config, events, logging};
