use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::constants::ERR_POISONED_LOCK;
use crate::{Lease, RawBoundedPool, Result, Reusable};

/// A thread-safe wrapper around [`RawBoundedPool`] that hands resources out as RAII leases.
///
/// This type acts as a cloneable handle to a shared pool instance. Multiple handles can
/// exist simultaneously, and the underlying pool remains alive as long as at least one
/// handle (or outstanding [`Lease`]) exists.
///
/// Checked-out resources travel inside a [`Lease`], which returns them to the pool when
/// dropped - there is no way to lose a resource and no way to return one twice.
///
/// # Thread safety
///
/// This type is thread-safe and can be shared freely across threads. Leases may be released
/// from any thread, not just the one that acquired them.
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// use bounded_pool::BoundedPool;
///
/// let pool = BoundedPool::new(2, || Vec::<u8>::with_capacity(1024));
///
/// // Clone the pool handle to share across threads.
/// let pool_clone = pool.clone();
///
/// let handle = thread::spawn(move || {
///     let mut lease = pool_clone.acquire().expect("pool has idle capacity");
///     lease.extend_from_slice(b"produced on another thread");
///     lease.len()
/// });
///
/// let written = handle.join().unwrap();
/// assert_eq!(written, 26);
/// assert_eq!(pool.idle_count(), 2);
/// ```
pub struct BoundedPool<R: Reusable> {
    /// The shared pool instance protected by a mutex for thread safety.
    inner: Arc<Mutex<RawBoundedPool<R>>>,
}

impl<R: Reusable> Clone for BoundedPool<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reusable> From<RawBoundedPool<R>> for BoundedPool<R> {
    /// Wraps an existing raw pool in thread-safe reference counting.
    fn from(pool: RawBoundedPool<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }
}

impl<R: Reusable> BoundedPool<R> {
    /// Creates a new pool by eagerly invoking an infallible factory `capacity` times.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bounded_pool::BoundedPool;
    ///
    /// let pool = BoundedPool::new(4, || Vec::<u8>::with_capacity(4096));
    ///
    /// assert_eq!(pool.capacity(), 4);
    /// assert_eq!(pool.idle_count(), 4);
    /// ```
    #[must_use]
    pub fn new<F>(capacity: usize, factory: F) -> Self
    where
        F: FnMut() -> R,
    {
        Self::from(RawBoundedPool::new(capacity, factory))
    }

    /// Creates a new pool by eagerly invoking a fallible factory `capacity` times.
    ///
    /// The first factory failure is returned as
    /// [`PoolError::Construction`][crate::PoolError::Construction] and the partially
    /// constructed pool is discarded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bounded_pool::BoundedPool;
    ///
    /// let pool = BoundedPool::try_new(2, || {
    ///     Ok::<_, std::io::Error>(Vec::<u8>::with_capacity(1024))
    /// })
    /// .expect("factory cannot fail here");
    ///
    /// assert_eq!(pool.idle_count(), 2);
    /// ```
    pub fn try_new<F, E>(capacity: usize, factory: F) -> Result<Self>
    where
        F: FnMut() -> std::result::Result<R, E>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Ok(Self::from(RawBoundedPool::try_new(capacity, factory)?))
    }

    /// Checks out one idle resource as a [`Lease`], or returns `None` if every resource is
    /// in use.
    ///
    /// This never blocks: an exhausted pool is a normal, observable outcome. Callers that
    /// want to wait for capacity decide their own retry policy.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bounded_pool::BoundedPool;
    ///
    /// let pool = BoundedPool::new(2, || Vec::<u8>::new());
    ///
    /// let first = pool.acquire().expect("two resources idle");
    /// let second = pool.acquire().expect("one resource idle");
    ///
    /// // Capacity is a hard bound - the third checkout reports exhaustion.
    /// assert!(pool.acquire().is_none());
    ///
    /// drop(first);
    /// assert!(pool.acquire().is_some());
    /// # drop(second);
    /// ```
    #[must_use]
    pub fn acquire(&self) -> Option<Lease<R>> {
        let (lease_id, resource) = {
            let mut pool = self.inner.lock().expect(ERR_POISONED_LOCK);
            pool.acquire()?
        };

        Some(Lease::new(resource, lease_id, self.clone()))
    }

    /// Explicitly returns a lease to this pool.
    ///
    /// Equivalent to dropping the lease, except that misuse is reported: releasing a lease
    /// issued by a *different* pool fails with
    /// [`PoolError::ForeignLease`][crate::PoolError::ForeignLease]. The foreign lease is
    /// still returned to its issuing pool via its drop path, so no resource is lost either
    /// way.
    ///
    /// The resource is reset before re-entering the idle set.
    pub fn release(&self, lease: Lease<R>) -> Result<()> {
        if !lease.is_issued_by(self) {
            // The drop of `lease` returns the resource to the pool that issued it.
            return Err(crate::PoolError::ForeignLease);
        }

        let (lease_id, resource) = lease.into_parts();
        self.return_parts(lease_id, resource)
    }

    /// Returns a disassembled lease to the idle set. Shared by the explicit release path
    /// and the lease drop path.
    pub(crate) fn return_parts(&self, lease_id: u64, resource: R) -> Result<()> {
        let mut pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.release(lease_id, resource)
    }

    /// Whether two handles refer to the same underlying pool.
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The total number of resources owned by this pool, fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        let pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.capacity()
    }

    /// The number of resources ready to be checked out.
    ///
    /// This operation may block briefly if another thread is currently accessing the pool.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        let pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.idle_count()
    }

    /// The number of resources currently checked out.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        let pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.in_use_count()
    }

    /// Whether the next [`acquire()`][Self::acquire] would return `None`.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        let pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.is_exhausted()
    }
}

impl<R: Reusable> fmt::Debug for BoundedPool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        f.debug_struct("BoundedPool").field("inner", &*pool).finish()
    }
}
