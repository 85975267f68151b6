/// A resource that can be handed out by a pool and reused after being returned.
///
/// Implementations are expected to be expensive to construct (that is why they are pooled)
/// and cheap to reset. [`reset()`][Self::reset] must return all logical state (length,
/// position, contents) to the fresh default while keeping any expensive backing allocation
/// intact - a borrower must never be able to observe data left behind by a previous borrower.
///
/// # Example
///
/// ```rust
/// use bounded_pool::Reusable;
///
/// struct Cursor {
///     buffer: Vec<u8>,
///     position: usize,
/// }
///
/// impl Reusable for Cursor {
///     fn reset(&mut self) {
///         self.buffer.clear();
///         self.position = 0;
///     }
/// }
/// ```
pub trait Reusable {
    /// Returns the logical state of the resource to the fresh default.
    ///
    /// Called by the pool every time a resource is returned, before it re-enters the idle set.
    fn reset(&mut self);
}

/// Clears the contents while keeping the allocated capacity for the next borrower.
impl<T> Reusable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// Clears the contents while keeping the allocated capacity for the next borrower.
impl Reusable for String {
    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_reset_clears_but_keeps_capacity() {
        let mut buffer = Vec::with_capacity(64);
        buffer.extend_from_slice(b"leftover");

        buffer.reset();

        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 64);
    }

    #[test]
    fn string_reset_clears_but_keeps_capacity() {
        let mut value = String::with_capacity(32);
        value.push_str("leftover");

        value.reset();

        assert!(value.is_empty());
        assert!(value.capacity() >= 32);
    }
}
