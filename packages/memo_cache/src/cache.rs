use std::error::Error;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use foldhash::{HashMap, HashMapExt};
use rsevents::Awaitable;

use crate::constants::ERR_POISONED_LOCK;
use crate::{CacheError, FailureReason, InFlight, Result};

/// The compute function bound to a cache for its entire lifetime.
type ComputeFn<K, V> =
    Box<dyn Fn(&K) -> std::result::Result<V, Box<dyn Error + Send + Sync>> + Send + Sync>;

/// A thread-safe memoization cache bound to a single compute function.
///
/// For any key, the compute function runs at most once across the cache's lifetime, no
/// matter how many callers race on the first access. Callers that arrive while a
/// computation for their key is in flight park until it completes and then receive the
/// same value.
///
/// A failed computation is surfaced to the computing caller and every waiter, then
/// forgotten: the key is not retained, so a later lookup retries. The compute function is
/// expected to be a function of the key alone - the cache does not enforce purity, but its
/// single-execution guarantee assumes it.
///
/// # Entry lifecycle
///
/// Each key moves through `vacant -> pending -> resolved` on success, or back from
/// `pending` to `vacant` on failure. `resolved` is terminal. The entry table is guarded by
/// a single mutex that is held only for table transitions, never while the compute
/// function runs.
///
/// # Example
///
/// ```rust
/// use memo_cache::MemoCache;
///
/// let cache = MemoCache::new(|name: &String| {
///     // Stand-in for an expensive derivation.
///     Ok::<_, std::convert::Infallible>(name.to_uppercase())
/// });
///
/// let value = cache.get(&"alice".to_string()).unwrap();
/// assert_eq!(value, "ALICE");
/// ```
///
/// # Thread safety
///
/// This type is thread-safe; share it between threads via `Arc` or a reference.
pub struct MemoCache<K, V> {
    /// The bound compute function. Runs outside the entry-table lock.
    compute: ComputeFn<K, V>,

    /// Key-to-entry table. We use foldhash for better performance with small hash tables.
    entries: Mutex<HashMap<K, EntryState<V>>>,
}

/// The state of one key in the entry table. Vacancy is represented by absence.
enum EntryState<V> {
    /// A caller is currently running the compute function for this key; later arrivals
    /// park on the shared in-flight record.
    Pending(Arc<InFlight<V>>),

    /// The computation completed; the value is served to all future lookups.
    Resolved(V),
}

impl<K, V> MemoCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Creates a new cache bound to the given compute function.
    ///
    /// Nothing is computed until the first [`get()`][Self::get].
    ///
    /// # Example
    ///
    /// ```rust
    /// use memo_cache::MemoCache;
    ///
    /// let cache = MemoCache::new(|n: &u32| Ok::<_, std::convert::Infallible>(n + 1));
    /// assert!(cache.is_empty());
    /// ```
    #[must_use]
    pub fn new<F, E>(compute: F) -> Self
    where
        F: Fn(&K) -> std::result::Result<V, E> + Send + Sync + 'static,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            compute: Box::new(move |key| compute(key).map_err(Into::into)),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value for `key`, computing it if this is the first lookup.
    ///
    /// A resolved key returns immediately. A vacant key makes this caller run the compute
    /// function. A pending key parks this caller until the in-flight computation finishes,
    /// then returns its outcome - success and failure alike are shared with all waiters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// use memo_cache::MemoCache;
    ///
    /// static CALLS: AtomicUsize = AtomicUsize::new(0);
    ///
    /// let cache = MemoCache::new(|n: &u64| {
    ///     CALLS.fetch_add(1, Ordering::SeqCst);
    ///     Ok::<_, std::convert::Infallible>(n * 2)
    /// });
    ///
    /// assert_eq!(cache.get(&5).unwrap(), 10);
    /// assert_eq!(cache.get(&5).unwrap(), 10);
    /// assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    /// ```
    pub fn get(&self, key: &K) -> Result<V> {
        self.get_inner(key, None)
    }

    /// Like [`get()`][Self::get], but a caller waiting on another caller's in-flight
    /// computation gives up with [`CacheError::Timeout`] after `limit`.
    ///
    /// The limit bounds only the wait on someone else's computation; if this caller ends up
    /// computing itself, the computation runs to completion. The in-flight computation is
    /// never affected by a waiter timing out - it still resolves for everyone else.
    pub fn get_for(&self, key: &K, limit: Duration) -> Result<V> {
        self.get_inner(key, Some(limit))
    }

    // A mutation here looks like an in-flight computation that never finishes, which
    // turns the wait into a hang.
    #[cfg_attr(test, mutants::skip)]
    fn get_inner(&self, key: &K, limit: Option<Duration>) -> Result<V> {
        loop {
            let in_flight = {
                let mut entries = self.entries.lock().expect(ERR_POISONED_LOCK);

                match entries.get(key) {
                    Some(EntryState::Resolved(value)) => return Ok(value.clone()),
                    Some(EntryState::Pending(in_flight)) => Arc::clone(in_flight),
                    None => {
                        // Vacant - this caller becomes the computer. The pending entry is
                        // visible to other callers before the lock is dropped.
                        let in_flight = Arc::new(InFlight::new());
                        entries.insert(key.clone(), EntryState::Pending(Arc::clone(&in_flight)));
                        drop(entries);

                        return self.compute_entry(key, &in_flight);
                    }
                }
            };

            // Someone else is computing this key. Park until they publish.
            match limit {
                None => in_flight.done.wait(),
                Some(limit) => {
                    if in_flight.done.try_wait_for(limit).is_err() {
                        return Err(CacheError::Timeout);
                    }
                }
            }

            match in_flight.outcome.get() {
                Some(Ok(value)) => return Ok(value.clone()),
                Some(Err(reason)) => {
                    return Err(CacheError::Compute {
                        source: Arc::clone(reason),
                    });
                }
                // The computer panicked before publishing; the entry has been removed.
                // Re-enter the lookup and retry from vacant.
                None => {}
            }
        }
    }

    /// Runs the compute function as the caller that owns the pending entry for `key`.
    fn compute_entry(&self, key: &K, in_flight: &Arc<InFlight<V>>) -> Result<V> {
        // If the compute function panics we must not leave waiters parked forever: remove
        // the pending entry so later callers retry, then signal with no outcome published.
        let cleanup_entries = &self.entries;
        let cleanup_key = key.clone();
        let cleanup_signal = Arc::clone(in_flight);
        let cleanup_guard = scopeguard::guard((), move |()| {
            let mut entries = cleanup_entries.lock().expect(ERR_POISONED_LOCK);
            entries.remove(&cleanup_key);
            drop(entries);

            cleanup_signal.done.set();
        });

        match (self.compute)(key) {
            Ok(value) => {
                {
                    let mut entries = self.entries.lock().expect(ERR_POISONED_LOCK);
                    entries.insert(key.clone(), EntryState::Resolved(value.clone()));
                }

                // Disarm the cleanup guard since the computation succeeded.
                scopeguard::ScopeGuard::into_inner(cleanup_guard);

                in_flight.publish(Ok(value.clone()));

                Ok(value)
            }
            Err(e) => {
                let reason: FailureReason = Arc::from(e);

                // Failures are not cached: the entry goes back to vacant so a later
                // lookup retries the computation.
                {
                    let mut entries = self.entries.lock().expect(ERR_POISONED_LOCK);
                    entries.remove(key);
                }

                scopeguard::ScopeGuard::into_inner(cleanup_guard);

                in_flight.publish(Err(Arc::clone(&reason)));

                Err(CacheError::Compute { source: reason })
            }
        }
    }

    /// The number of resolved entries in the cache.
    ///
    /// In-flight computations are not counted - they have not produced a value yet.
    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect(ERR_POISONED_LOCK);
        entries
            .values()
            .filter(|state| matches!(state, EntryState::Resolved(_)))
            .count()
    }

    /// Whether the cache holds no resolved entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock().expect(ERR_POISONED_LOCK);
        f.debug_struct("MemoCache")
            .field("entries", &entries.len())
            .field(
                "compute",
                &format_args!("<fn(&{}) -> {}>", std::any::type_name::<K>(), std::any::type_name::<V>()),
            )
            .finish()
    }
}
