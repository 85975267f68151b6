use std::error::Error;
use std::sync::{Arc, OnceLock};

use rsevents::{EventState, ManualResetEvent};

/// A compute failure, shared between the computing caller and all waiters for the key.
pub(crate) type FailureReason = Arc<dyn Error + Send + Sync>;

/// Shared record of one in-flight computation.
///
/// The computing caller publishes into `outcome` and then signals `done`; waiters park on
/// `done` and read `outcome` afterwards. If the compute function panics, `done` is signaled
/// with `outcome` left empty - waiters treat that as "the computation evaporated" and
/// re-enter the lookup, where the entry has already been removed.
pub(crate) struct InFlight<V> {
    /// Signaled exactly once, after the computation has finished (successfully or not).
    pub(crate) done: ManualResetEvent,

    /// The published result. Written at most once, before `done` is signaled.
    pub(crate) outcome: OnceLock<std::result::Result<V, FailureReason>>,
}

impl<V> InFlight<V> {
    pub(crate) fn new() -> Self {
        Self {
            done: ManualResetEvent::new(EventState::Unset),
            outcome: OnceLock::new(),
        }
    }

    /// Publishes the outcome and releases all waiters. Called exactly once per computation.
    pub(crate) fn publish(&self, outcome: std::result::Result<V, FailureReason>) {
        if self.outcome.set(outcome).is_err() {
            unreachable!("in-flight computation published its outcome twice");
        }

        self.done.set();
    }
}
