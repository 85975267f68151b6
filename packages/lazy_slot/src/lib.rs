//! Deferred, thread-safe, exactly-once construction of a shared value.
//!
//! This crate provides [`LazySlot`], a slot that holds an expensive-to-construct value and
//! builds it on first access. Concurrent first accesses race to claim the slot; exactly one
//! caller runs the factory while the rest park (no spinning) and then receive the same
//! shared instance. Once constructed, every access is a lock-free load plus a reference
//! count bump - no synchronization proportional to construction cost.
//!
//! # Key features
//!
//! - **Exactly-once construction**: the factory runs once no matter how many threads race
//!   on the first access; every caller gets the same `Arc<T>`.
//! - **Failures are not sticky**: if the factory fails, the failure propagates to the
//!   constructing caller and every parked waiter, the slot returns to empty and a later
//!   access retries. Transient errors never wedge the slot permanently.
//! - **Cheap resolved reads**: after construction, [`get()`][LazySlot::get] is a single
//!   atomic load and an `Arc` clone.
//! - **Bounded waiting (optional)**: [`get_for()`][LazySlot::get_for] lets a waiting caller
//!   give up after a deadline without disturbing the in-flight construction.
//!
//! # Example
//!
//! ```rust
//! use lazy_slot::LazySlot;
//!
//! struct Config {
//!     threads: usize,
//! }
//!
//! let slot = LazySlot::new(|| {
//!     // Stand-in for reading files, probing hardware, etc.
//!     Ok::<_, std::convert::Infallible>(Config { threads: 8 })
//! });
//!
//! // Nothing is constructed yet.
//! assert!(slot.try_get().is_none());
//!
//! let config = slot.get().unwrap();
//! assert_eq!(config.threads, 8);
//!
//! // Later accesses return the same shared instance.
//! let again = slot.get().unwrap();
//! assert!(std::sync::Arc::ptr_eq(&config, &again));
//! ```

mod error;
mod slot;

pub use error::*;
pub use slot::LazySlot;
