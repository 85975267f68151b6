use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur when accessing a lazily constructed slot.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum SlotError {
    /// The factory failed while constructing the value.
    ///
    /// The failure is shared between the constructing caller and every caller that was
    /// waiting on the slot, which is why the source is reference-counted. The slot returns
    /// to empty - a later access retries construction.
    #[error("factory failed while constructing the slot value")]
    Construction {
        /// The failure reported by the factory.
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },

    /// The bounded wait on another caller's in-flight construction expired.
    ///
    /// The in-flight construction itself is unaffected and still resolves for other waiters.
    #[error("timed out waiting for an in-flight construction")]
    Timeout,
}

/// A specialized `Result` type for slot operations, returning the crate's
/// [`SlotError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, SlotError>;

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(SlotError: Send, Sync, Debug, Clone);

    #[test]
    fn construction_preserves_source() {
        let error = SlotError::Construction {
            source: Arc::from(Box::<dyn Error + Send + Sync>::from("probe failed")),
        };

        let source = Error::source(&error).expect("construction error carries a source");
        assert_eq!(source.to_string(), "probe failed");
    }
}
