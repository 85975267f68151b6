use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{BoundedPool, Reusable};

/// Exclusive ownership of one checked-out pool resource.
///
/// While a lease is alive, the resource it wraps is reachable only through the lease - the
/// pool keeps no reference of any kind to it. The lease can be returned explicitly via
/// [`BoundedPool::release()`] or implicitly by dropping it; either way the resource is reset
/// and re-enters the idle set of the pool that issued the lease.
///
/// A lease cannot be cloned, so double-return and use-after-return are unrepresentable.
///
/// # Example
///
/// ```rust
/// use bounded_pool::BoundedPool;
///
/// let pool = BoundedPool::new(1, || Vec::<u8>::with_capacity(1024));
///
/// {
///     let mut lease = pool.acquire().expect("pool starts idle");
///     lease.extend_from_slice(b"scratch");
/// } // Dropping the lease returns the buffer to the pool.
///
/// assert_eq!(pool.idle_count(), 1);
/// ```
pub struct Lease<R: Reusable> {
    /// `Some` until the resource is handed back to the pool. Taken exactly once, either by
    /// the explicit release path or by the drop path.
    resource: Option<R>,

    /// Identifies this checkout in the issuing pool's outstanding-lease ledger.
    lease_id: u64,

    /// The pool that issued this lease. Holding a handle clone keeps the pool state alive
    /// for as long as any lease is outstanding and lets the drop path return the resource
    /// from any thread.
    pool: BoundedPool<R>,
}

const ERR_RESOURCE_TAKEN: &str = "lease holds its resource until it is returned to the pool";

impl<R: Reusable> Lease<R> {
    pub(crate) fn new(resource: R, lease_id: u64, pool: BoundedPool<R>) -> Self {
        Self {
            resource: Some(resource),
            lease_id,
            pool,
        }
    }

    /// Whether this lease was issued by the given pool.
    pub(crate) fn is_issued_by(&self, pool: &BoundedPool<R>) -> bool {
        self.pool.ptr_eq(pool)
    }

    /// Disassembles the lease without triggering the drop path.
    pub(crate) fn into_parts(mut self) -> (u64, R) {
        let resource = self.resource.take().expect(ERR_RESOURCE_TAKEN);
        (self.lease_id, resource)
    }
}

impl<R: Reusable> Deref for Lease<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        self.resource.as_ref().expect(ERR_RESOURCE_TAKEN)
    }
}

impl<R: Reusable> DerefMut for Lease<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resource.as_mut().expect(ERR_RESOURCE_TAKEN)
    }
}

impl<R: Reusable> Drop for Lease<R> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            let result = self.pool.return_parts(self.lease_id, resource);

            // A lease can only ever come back to the pool that issued it.
            debug_assert!(result.is_ok(), "pool rejected a lease it issued");
        }
    }
}

impl<R: Reusable> fmt::Debug for Lease<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("lease_id", &self.lease_id)
            .field(
                "resource",
                &format_args!("<{}>", std::any::type_name::<R>()),
            )
            .finish()
    }
}
