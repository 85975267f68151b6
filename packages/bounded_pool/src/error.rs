use std::error::Error;

use thiserror::Error;

/// Errors that can occur when constructing or operating a pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolError {
    /// The resource factory supplied to the constructor failed before the pool was fully
    /// populated. The partially constructed pool is discarded.
    #[error("resource factory failed during pool construction")]
    Construction {
        /// The failure reported by the factory.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// The caller released a lease that this pool does not track as outstanding, i.e. a lease
    /// issued by a different pool. This is caller misuse; the resource is returned to the pool
    /// that actually issued the lease.
    #[error("released a lease that is not tracked by this pool")]
    ForeignLease,
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`PoolError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, PoolError>;
