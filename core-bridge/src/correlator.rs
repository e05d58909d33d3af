//! Bookkeeping for in-flight host -> content calls.
//!
//! The evaluation primitive already pairs each call with its own reply, so
//! the correlator does not match replies to calls. It only makes every
//! outstanding call abandonable: destroying the content view must settle all
//! of them instead of leaving suspended callers behind.
//!
//! Each call holds a [`PendingCall`] guard. [`CallCorrelator::abandon_all`]
//! drops the sending half of every guard's signal, which wakes the guard's
//! [`PendingCall::run`] and makes it return `None`. Once abandoned, the
//! correlator refuses new calls.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{self, Either};
use parking_lot::Mutex;

#[derive(Default)]
struct CorrelatorState {
    closed: bool,
    pending: HashMap<u64, oneshot::Sender<()>>,
}

#[derive(Default)]
pub struct CallCorrelator {
    next_id: AtomicU64,
    state: Mutex<CorrelatorState>,
}

impl CallCorrelator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a new call. `None` once [`abandon_all`](Self::abandon_all)
    /// has run.
    pub fn begin(self: &Arc<Self>) -> Option<PendingCall> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (signal, abandoned) = oneshot::channel();
        state.pending.insert(id, signal);

        Some(PendingCall {
            id,
            abandoned,
            correlator: Arc::clone(self),
        })
    }

    /// Abandon every outstanding call and refuse new ones. Returns how many
    /// were outstanding.
    pub fn abandon_all(&self) -> usize {
        let pending = {
            let mut state = self.state.lock();
            state.closed = true;
            std::mem::take(&mut state.pending)
        };
        // Senders are dropped outside the lock; waking a receiver can run its
        // task inline on some executors.
        let count = pending.len();
        drop(pending);
        count
    }

    pub fn in_flight(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn finish(&self, id: u64) {
        self.state.lock().pending.remove(&id);
    }
}

/// One registered call. Deregisters itself when dropped.
pub struct PendingCall {
    id: u64,
    abandoned: oneshot::Receiver<()>,
    correlator: Arc<CallCorrelator>,
}

impl PendingCall {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Drive `call` until it finishes or the call is abandoned, whichever
    /// comes first. `None` means abandoned; `call` is dropped unfinished.
    pub async fn run<F>(mut self, call: F) -> Option<F::Output>
    where
        F: Future,
    {
        futures::pin_mut!(call);

        match future::select(call, &mut self.abandoned).await {
            Either::Left((output, _)) => Some(output),
            Either::Right(_) => None,
        }
    }
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        self.correlator.finish(self.id);
    }
}
