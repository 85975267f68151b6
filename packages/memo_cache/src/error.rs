use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur when looking up a key in a cache.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    /// The compute function failed for the requested key.
    ///
    /// The failure is shared between the computing caller and every caller that was waiting
    /// on the same key, which is why the source is reference-counted. The failed key is not
    /// retained - a later lookup retries the computation.
    #[error("compute function failed for the requested key")]
    Compute {
        /// The failure reported by the compute function.
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },

    /// The bounded wait on another caller's in-flight computation expired.
    ///
    /// The in-flight computation itself is unaffected and still resolves for other waiters.
    #[error("timed out waiting for an in-flight computation")]
    Timeout,
}

/// A specialized `Result` type for cache operations, returning the crate's
/// [`CacheError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(CacheError: Send, Sync, Debug, Clone);

    #[test]
    fn compute_preserves_source() {
        let error = CacheError::Compute {
            source: Arc::from(Box::<dyn Error + Send + Sync>::from("backend unavailable")),
        };

        let source = Error::source(&error).expect("compute error carries a source");
        assert_eq!(source.to_string(), "backend unavailable");
    }
}
