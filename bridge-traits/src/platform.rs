//! Threading markers that keep capability bounds aligned with each target.
//!
//! Native hosts share content-view adapters across async tasks, so the
//! capability traits require `Send + Sync` there. In a `wasm32` build the
//! browser objects backing an adapter are single-threaded and cannot satisfy
//! those bounds, so the markers collapse to no-ops.

/// `Send + Sync` on native targets, no bound on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}
