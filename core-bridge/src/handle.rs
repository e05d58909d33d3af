//! Caller-facing handle to a bridged content view.
//!
//! A [`BridgeHandle`] is created by the host before the content view exists
//! and passed to [`WebNativeBridge::new`](crate::WebNativeBridge::new). It
//! moves through three states:
//!
//! ```text
//! Unbound --attach--> Bound --teardown--> Destroyed
//! ```
//!
//! Attaching first reserves the handle under the state lock, so only one
//! attach can proceed; a failed attach releases the reservation and the
//! handle reads as `Unbound` throughout.
//!
//! Each transition happens at most once. Outside `Bound` every operation is a
//! safe default: [`send_to_content`](BridgeHandle::send_to_content) resolves
//! to `Ok(None)`, [`reload`](BridgeHandle::reload) does nothing and
//! [`current_location`](BridgeHandle::current_location) is `None`.
//!
//! The handle is cheap to clone; all clones share one state.

use std::fmt;
use std::sync::Arc;

use bridge_traits::content::ContentView;
use core_runtime::events::{BridgeEvent, CallOutcome, EventBus};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use crate::correlator::CallCorrelator;
use crate::error::{Error, Result};
use crate::outbound::OutboundCaller;

/// Observable lifecycle state of a [`BridgeHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unbound,
    Bound,
    Destroyed,
}

#[derive(Clone)]
struct BoundView {
    view: Arc<dyn ContentView>,
    caller: Arc<OutboundCaller>,
    events: EventBus,
}

enum HandleState {
    Unbound,
    /// Claimed by an attach that has not finished installing.
    Reserved,
    Bound(BoundView),
    Destroyed,
}

impl HandleState {
    fn lifecycle(&self) -> LifecycleState {
        match self {
            HandleState::Unbound | HandleState::Reserved => LifecycleState::Unbound,
            HandleState::Bound(_) => LifecycleState::Bound,
            HandleState::Destroyed => LifecycleState::Destroyed,
        }
    }
}

struct HandleInner {
    state: RwLock<HandleState>,
    correlator: Arc<CallCorrelator>,
}

#[derive(Clone)]
pub struct BridgeHandle {
    inner: Arc<HandleInner>,
}

impl BridgeHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HandleInner {
                state: RwLock::new(HandleState::Unbound),
                correlator: CallCorrelator::new(),
            }),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.read(HandleState::lifecycle)
    }

    pub fn is_bound(&self) -> bool {
        self.state() == LifecycleState::Bound
    }

    /// Outbound calls currently awaiting the content side.
    pub fn in_flight(&self) -> usize {
        self.inner.correlator.in_flight()
    }

    /// Send `payload` to the content responder and await its response.
    ///
    /// Resolves to `Ok(None)` when the responder returned nothing, when the
    /// handle is not bound, or when the content view is destroyed while the
    /// call is in flight.
    ///
    /// # Errors
    ///
    /// - [`Error::NoHandlerRegistered`] if content never assigned its responder
    /// - [`Error::ContentRejected`] if the responder threw or rejected
    /// - [`Error::Transport`] if evaluation itself failed or timed out
    /// - [`Error::Payload`] if the payload or response exceeds the limits
    pub async fn send_to_content(&self, payload: Value) -> Result<Option<Value>> {
        let Some(bound) = self.bound() else {
            debug!(state = ?self.state(), "send_to_content on a handle that is not bound");
            return Ok(None);
        };
        let Some(pending) = self.inner.correlator.begin() else {
            return Ok(None);
        };

        let call_id = pending.id();
        let result = pending
            .run(bound.caller.call(bound.view.as_ref(), payload))
            .await;

        let outcome = match &result {
            None => CallOutcome::Abandoned,
            Some(Ok(Some(_))) => CallOutcome::Value,
            Some(Ok(None)) => CallOutcome::NoContent,
            Some(Err(_)) => CallOutcome::Error,
        };
        bound
            .events
            .emit(BridgeEvent::OutboundCompleted { call_id, outcome });

        match result {
            Some(result) => result,
            None => {
                debug!(call_id, "Outbound call abandoned by content view teardown");
                Ok(None)
            }
        }
    }

    /// Navigate the content view to `address`. No-op unless bound.
    pub fn reload(&self, address: &str) {
        match self.bound() {
            Some(bound) => bound.view.load(address),
            None => debug!(state = ?self.state(), "reload on a handle that is not bound"),
        }
    }

    /// Address currently loaded in the content view, if bound.
    pub fn current_location(&self) -> Option<String> {
        self.bound().and_then(|bound| bound.view.current_location())
    }

    /// Claim the handle for one attach. Fails unless it is `Unbound`.
    pub(crate) fn reserve(&self) -> Result<()> {
        let mut state = self.inner.state.write();
        match &*state {
            HandleState::Unbound => {}
            HandleState::Reserved | HandleState::Bound(_) => return Err(Error::AlreadyBound),
            HandleState::Destroyed => return Err(Error::Destroyed),
        }

        *state = HandleState::Reserved;
        Ok(())
    }

    /// Give up a reservation taken by [`reserve`](Self::reserve).
    pub(crate) fn release(&self) {
        let mut state = self.inner.state.write();
        if matches!(*state, HandleState::Reserved) {
            *state = HandleState::Unbound;
        }
    }

    /// Complete a reservation.
    pub(crate) fn bind(
        &self,
        view: Arc<dyn ContentView>,
        caller: Arc<OutboundCaller>,
        events: EventBus,
    ) -> Result<()> {
        let mut state = self.inner.state.write();
        match &*state {
            HandleState::Reserved => {}
            HandleState::Destroyed => return Err(Error::Destroyed),
            HandleState::Unbound | HandleState::Bound(_) => return Err(Error::AlreadyBound),
        }

        *state = HandleState::Bound(BoundView {
            view,
            caller,
            events,
        });
        Ok(())
    }

    /// Move to `Destroyed`, settling every in-flight call. Returns the number
    /// of calls abandoned, or `None` if the handle was already destroyed.
    pub(crate) fn destroy(&self) -> Option<usize> {
        let previous = {
            let mut state = self.inner.state.write();
            std::mem::replace(&mut *state, HandleState::Destroyed)
        };
        if matches!(previous, HandleState::Destroyed) {
            return None;
        }

        let abandoned = self.inner.correlator.abandon_all();
        info!(abandoned, "Bridge handle destroyed");
        Some(abandoned)
    }

    fn bound(&self) -> Option<BoundView> {
        self.read(|state| match state {
            HandleState::Bound(bound) => Some(bound.clone()),
            _ => None,
        })
    }

    fn read<T>(&self, f: impl FnOnce(&HandleState) -> T) -> T {
        let state = self.inner.state.read();
        f(&*state)
    }
}

impl Default for BridgeHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("state", &self.state())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
