use std::error::Error;
use std::fmt;

use foldhash::{HashSet, HashSetExt};

use crate::{PoolError, Result, Reusable};

/// A bounded single-threaded pool of pre-allocated reusable resources.
///
/// All resources are constructed eagerly when the pool is created and the pool never grows
/// past that capacity. Checking out a resource transfers it to the caller together with a
/// lease ID; returning it requires presenting the same lease ID, which lets the pool detect
/// attempts to return a resource it never issued.
///
/// At every point in time `idle_count() + in_use_count() <= capacity()` holds. The pool
/// holds no reference of any kind to checked-out resources.
///
/// # Example
///
/// ```rust
/// use bounded_pool::RawBoundedPool;
///
/// let mut pool = RawBoundedPool::new(2, || Vec::<u8>::with_capacity(512));
///
/// let (lease_id, mut buffer) = pool.acquire().expect("pool starts fully idle");
/// buffer.extend_from_slice(b"payload");
///
/// pool.release(lease_id, buffer).expect("lease was issued by this pool");
/// assert_eq!(pool.idle_count(), 2);
/// ```
///
/// # Thread safety
///
/// This type is thread-mobile ([`Send`]) but not thread-safe ([`Sync`]). For a pool that can
/// be shared between threads, use [`BoundedPool`][crate::BoundedPool] instead.
pub struct RawBoundedPool<R: Reusable> {
    /// Resources currently owned by the pool, ready to be checked out.
    idle: Vec<R>,

    /// Lease IDs of every checked-out resource. A release is only accepted if its lease ID
    /// is present here - anything else is a resource this pool never issued.
    /// We use foldhash for better performance with small hash tables.
    outstanding: HashSet<u64>,

    /// Total number of resources owned by this pool, fixed at construction.
    capacity: usize,

    /// The lease ID to assign to the next checkout.
    next_lease_id: u64,
}

impl<R: Reusable> RawBoundedPool<R> {
    /// Creates a new pool by eagerly invoking an infallible factory `capacity` times.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bounded_pool::RawBoundedPool;
    ///
    /// let pool = RawBoundedPool::new(4, || String::with_capacity(256));
    /// assert_eq!(pool.capacity(), 4);
    /// assert_eq!(pool.idle_count(), 4);
    /// ```
    #[must_use]
    pub fn new<F>(capacity: usize, mut factory: F) -> Self
    where
        F: FnMut() -> R,
    {
        let mut idle = Vec::with_capacity(capacity);

        for _ in 0..capacity {
            idle.push(factory());
        }

        Self {
            idle,
            outstanding: HashSet::new(),
            capacity,
            next_lease_id: 0,
        }
    }

    /// Creates a new pool by eagerly invoking a fallible factory `capacity` times.
    ///
    /// The first factory failure is returned as [`PoolError::Construction`] and the
    /// partially constructed pool is discarded, dropping any resources built so far.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bounded_pool::RawBoundedPool;
    ///
    /// let pool = RawBoundedPool::try_new(2, || {
    ///     Ok::<_, std::io::Error>(Vec::<u8>::with_capacity(1024))
    /// })
    /// .expect("factory cannot fail here");
    ///
    /// assert_eq!(pool.idle_count(), 2);
    /// ```
    pub fn try_new<F, E>(capacity: usize, mut factory: F) -> Result<Self>
    where
        F: FnMut() -> std::result::Result<R, E>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let mut idle = Vec::with_capacity(capacity);

        for _ in 0..capacity {
            let resource = factory().map_err(|e| PoolError::Construction { source: e.into() })?;
            idle.push(resource);
        }

        Ok(Self {
            idle,
            outstanding: HashSet::new(),
            capacity,
            next_lease_id: 0,
        })
    }

    /// Checks out one idle resource, or returns `None` if every resource is in use.
    ///
    /// This never blocks - an exhausted pool is an observable outcome that callers must
    /// handle explicitly.
    ///
    /// The returned lease ID must be presented to [`release()`][Self::release] when the
    /// resource is returned.
    pub fn acquire(&mut self) -> Option<(u64, R)> {
        let resource = self.idle.pop()?;

        let lease_id = self.next_lease_id;
        self.next_lease_id = self.next_lease_id.wrapping_add(1);
        self.outstanding.insert(lease_id);

        Some((lease_id, resource))
    }

    /// Returns a checked-out resource to the idle set, resetting it first.
    ///
    /// The reset happens before the resource becomes available again, so no later borrower
    /// can observe state left behind by the previous one.
    ///
    /// Presenting a lease ID that this pool does not track as outstanding fails with
    /// [`PoolError::ForeignLease`] and the resource is dropped rather than adopted - the
    /// pool never grows past its capacity.
    pub fn release(&mut self, lease_id: u64, mut resource: R) -> Result<()> {
        if !self.outstanding.remove(&lease_id) {
            return Err(PoolError::ForeignLease);
        }

        resource.reset();
        self.idle.push(resource);

        Ok(())
    }

    /// The total number of resources owned by this pool, fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of resources ready to be checked out.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// The number of resources currently checked out.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.outstanding.len()
    }

    /// Whether the next [`acquire()`][Self::acquire] would return `None`.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.idle.is_empty()
    }
}

impl<R: Reusable> fmt::Debug for RawBoundedPool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBoundedPool")
            .field("capacity", &self.capacity)
            .field("idle", &self.idle.len())
            .field("in_use", &self.outstanding.len())
            .finish()
    }
}
