//! # Lifecycle Event Bus
//!
//! Broadcasts what happens on a bridge instance using `tokio::sync::broadcast`
//! so hosts can observe it (developer tooling, analytics, UI state) without
//! sitting on the protocol path.
//!
//! ## Overview
//!
//! - [`BridgeEvent`] - attach/destroy transitions and per-call outcomes
//! - [`EventBus`] - cloneable publisher; every subscriber gets every event
//!
//! Emitting never blocks and never fails the protocol: with no subscribers
//! the event is simply discarded.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{BridgeEvent, EventBus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut events = bus.subscribe();
//!
//! bus.emit(BridgeEvent::Destroyed { abandoned_calls: 0 });
//!
//! assert_eq!(
//!     events.recv().await.unwrap(),
//!     BridgeEvent::Destroyed { abandoned_calls: 0 }
//! );
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell `n` events behind; it can
//!   keep receiving.
//! - **`RecvError::Closed`**: every publisher was dropped (bridge gone).

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

use crate::config::DEFAULT_EVENT_BUFFER_SIZE;

pub use tokio::sync::broadcast::error::RecvError;
pub use tokio::sync::broadcast::Receiver;

/// Outcome of one bridged call, as reported on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// Settled with a value
    Value,
    /// Settled with no content
    NoContent,
    /// Settled with an error
    Error,
    /// The content view went away before the call settled
    Abandoned,
}

/// Events published by a bridge instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BridgeEvent {
    /// The bridge was installed into a content view and the handle bound.
    Attached { bridge_id: String, address: String },
    /// The content view was torn down.
    Destroyed { abandoned_calls: usize },
    /// A content -> host request was settled.
    InboundHandled { outcome: CallOutcome },
    /// A host -> content call finished.
    OutboundCompleted { call_id: u64, outcome: CallOutcome },
}

impl BridgeEvent {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Attached { .. } => "Bridge attached to content view",
            Self::Destroyed { .. } => "Content view destroyed",
            Self::InboundHandled { .. } => "Inbound request settled",
            Self::OutboundCompleted { .. } => "Outbound call finished",
        }
    }
}

/// Cloneable broadcast publisher for [`BridgeEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes `event`; returns how many subscribers received it.
    pub fn emit(&self, event: BridgeEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// New subscriber receiving all future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<BridgeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
