use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use rsevents::{Awaitable, EventState, ManualResetEvent};

use crate::{Result, SlotError};

/// The factory bound to a slot for its entire lifetime.
type FactoryFn<T> =
    Box<dyn Fn() -> std::result::Result<T, Box<dyn Error + Send + Sync>> + Send + Sync>;

/// A construction failure, shared between the constructing caller and all waiters.
type FailureReason = Arc<dyn Error + Send + Sync>;

/// A slot that constructs its value on first access, exactly once, even under contention.
///
/// The slot moves through `empty -> initializing -> ready` on success, or back from
/// `initializing` to `empty` on failure so that a later access can retry. `ready` is
/// terminal: the constructed value is immutable and shared (as an `Arc<T>`) for the
/// remaining lifetime of the slot.
///
/// The slot itself performs no locking. State transitions go through a single atomic
/// compare-and-swap and resolved reads are plain atomic loads; waiters park on an event
/// rather than spinning.
///
/// # Example
///
/// ```rust
/// use lazy_slot::LazySlot;
///
/// let slot = LazySlot::new(|| Ok::<_, std::convert::Infallible>("expensive".to_string()));
///
/// let value = slot.get().unwrap();
/// assert_eq!(*value, "expensive");
/// ```
///
/// # Thread safety
///
/// This type is thread-safe; share it between threads via `Arc` or a reference.
pub struct LazySlot<T> {
    /// The bound factory. Invoked at most once per construction attempt, never under a lock.
    factory: FactoryFn<T>,

    /// The slot state. `None` means empty; the two occupied states are below.
    state: ArcSwapOption<SlotState<T>>,
}

#[derive(derive_more::Debug)]
enum SlotState<T> {
    /// One caller has claimed the empty slot and is running the factory.
    ///
    /// Multiple callers may race to claim the slot; the claim is a conditional swap, so
    /// all but one line up behind the winner and park on the construction record.
    Initializing(#[debug(ignore)] Arc<Construction<T>>),

    /// The value has been constructed and is shared with every caller.
    Ready(Arc<T>),
}

/// Shared record of one in-flight construction.
///
/// The constructing caller publishes into `outcome` and then signals `done`; waiters park
/// on `done` and read `outcome` afterwards. If the factory panics, `done` is signaled with
/// `outcome` left empty - waiters treat that as "the construction evaporated" and re-enter
/// the access path, where the slot has already been reset to empty.
struct Construction<T> {
    /// Signaled exactly once, after the construction attempt has finished.
    done: ManualResetEvent,

    /// The published result. Written at most once, before `done` is signaled.
    outcome: OnceLock<std::result::Result<Arc<T>, FailureReason>>,
}

impl<T> Construction<T> {
    fn new() -> Self {
        Self {
            done: ManualResetEvent::new(EventState::Unset),
            outcome: OnceLock::new(),
        }
    }

    /// Publishes the outcome and releases all waiters. Called exactly once per attempt.
    fn publish(&self, outcome: std::result::Result<Arc<T>, FailureReason>) {
        if self.outcome.set(outcome).is_err() {
            unreachable!("in-flight construction published its outcome twice");
        }

        self.done.set();
    }
}

impl<T> LazySlot<T> {
    /// Creates a new empty slot bound to the given factory.
    ///
    /// The factory is not invoked; construction is deferred until the first
    /// [`get()`][Self::get].
    ///
    /// # Example
    ///
    /// ```rust
    /// use lazy_slot::LazySlot;
    ///
    /// let slot = LazySlot::new(|| Ok::<_, std::convert::Infallible>(vec![0_u8; 1024]));
    /// assert!(slot.try_get().is_none());
    /// ```
    #[must_use]
    pub fn new<F, E>(factory: F) -> Self
    where
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            factory: Box::new(move || factory().map_err(Into::into)),
            state: ArcSwapOption::const_empty(),
        }
    }

    /// Returns the shared value, constructing it if this is the first access.
    ///
    /// Concurrent first accesses result in exactly one factory invocation; every caller
    /// receives the same `Arc<T>`. Once the slot is ready, this is a lock-free load.
    ///
    /// If the factory fails, the failure is returned to this caller and to every parked
    /// waiter, and the slot returns to empty so a later call retries.
    pub fn get(&self) -> Result<Arc<T>> {
        self.get_inner(None)
    }

    /// Like [`get()`][Self::get], but a caller waiting on another caller's in-flight
    /// construction gives up with [`SlotError::Timeout`] after `limit`.
    ///
    /// The limit bounds only the wait on someone else's construction; if this caller ends
    /// up constructing itself, the factory runs to completion. The in-flight construction
    /// is never affected by a waiter timing out - it still resolves for everyone else.
    pub fn get_for(&self, limit: Duration) -> Result<Arc<T>> {
        self.get_inner(Some(limit))
    }

    /// Returns the value if the slot is ready, without triggering construction.
    #[must_use]
    pub fn try_get(&self) -> Option<Arc<T>> {
        let current = self.state.load();

        match current.as_ref().map(|state| &**state) {
            Some(SlotState::Ready(value)) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    // A mutation here looks like a construction that never finishes, which turns the
    // wait into a hang.
    #[cfg_attr(test, mutants::skip)]
    fn get_inner(&self, limit: Option<Duration>) -> Result<Arc<T>> {
        loop {
            let current = self.state.load();

            if let Some(state) = current.as_ref() {
                match &**state {
                    SlotState::Ready(value) => return Ok(Arc::clone(value)),
                    SlotState::Initializing(construction) => {
                        let construction = Arc::clone(construction);
                        drop(current);

                        // Someone else is constructing. Park until they publish.
                        match limit {
                            None => construction.done.wait(),
                            Some(limit) => {
                                if construction.done.try_wait_for(limit).is_err() {
                                    return Err(SlotError::Timeout);
                                }
                            }
                        }

                        match construction.outcome.get() {
                            Some(Ok(value)) => return Ok(Arc::clone(value)),
                            Some(Err(reason)) => {
                                return Err(SlotError::Construction {
                                    source: Arc::clone(reason),
                                });
                            }
                            // The constructor panicked before publishing; the slot has
                            // been reset. Re-enter and retry from empty.
                            None => continue,
                        }
                    }
                }
            }

            // The slot is empty. Race to claim it with a conditional swap; the losers
            // line up behind the winner on the next pass through the loop.
            let construction = Arc::new(Construction::new());
            let claim = SlotState::Initializing(Arc::clone(&construction));

            let previous = self.state.compare_and_swap(current, Some(Arc::new(claim)));
            if previous.is_some() {
                continue;
            }

            return self.construct(&construction);
        }
    }

    /// Runs the factory as the caller that claimed the empty slot.
    fn construct(&self, construction: &Arc<Construction<T>>) -> Result<Arc<T>> {
        // If the factory panics we must not leave waiters parked forever: reset the slot
        // so later callers retry, then signal with no outcome published.
        let cleanup_state = &self.state;
        let cleanup_signal = Arc::clone(construction);
        let cleanup_guard = scopeguard::guard((), move |()| {
            cleanup_state.store(None);
            cleanup_signal.done.set();
        });

        match (self.factory)() {
            Ok(value) => {
                let value = Arc::new(value);

                self.state
                    .store(Some(Arc::new(SlotState::Ready(Arc::clone(&value)))));

                // Disarm the cleanup guard since construction succeeded.
                scopeguard::ScopeGuard::into_inner(cleanup_guard);

                construction.publish(Ok(Arc::clone(&value)));

                Ok(value)
            }
            Err(e) => {
                let reason: FailureReason = Arc::from(e);

                // Failures are not sticky: the slot returns to empty so a later access
                // retries construction.
                self.state.store(None);

                scopeguard::ScopeGuard::into_inner(cleanup_guard);

                construction.publish(Err(Arc::clone(&reason)));

                Err(SlotError::Construction { source: reason })
            }
        }
    }
}

impl<T> fmt::Debug for LazySlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.state.load();

        let phase = match current.as_ref().map(|state| &**state) {
            None => "empty",
            Some(SlotState::Initializing(_)) => "initializing",
            Some(SlotState::Ready(_)) => "ready",
        };

        f.debug_struct("LazySlot")
            .field("state", &phase)
            .field(
                "value_type",
                &format_args!("<{}>", std::any::type_name::<T>()),
            )
            .finish()
    }
}
