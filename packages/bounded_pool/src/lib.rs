//! A bounded pool of pre-allocated, reusable resources.
//!
//! This crate provides [`BoundedPool`], a thread-safe pool that eagerly constructs a fixed
//! number of expensive-to-create resources (buffers, connections, scratch arenas) and hands
//! them out for temporary exclusive use. The pool never grows past its capacity - exhaustion
//! is reported to the caller instead of being hidden behind a blocking wait.
//!
//! # Key features
//!
//! - **Fixed capacity**: all resources are constructed up front; the pool never allocates more.
//! - **Non-blocking checkout**: [`acquire()`][BoundedPool::acquire] returns `None` when no idle
//!   resource exists, so exhaustion is an observable signal rather than a stall.
//! - **Exclusive ownership**: a checked-out resource is reachable only through its [`Lease`];
//!   the pool never touches the contents of a resource while it is checked out.
//! - **Reset on return**: resources are restored to their fresh state via [`Reusable::reset`]
//!   before re-entering the idle set, so no borrower observes a previous borrower's data.
//! - **Thread-safe handles**: the pool is a cloneable handle that can be shared freely between
//!   threads; leases may be released from any thread, not just the acquiring one.
//!
//! # Example
//!
//! ```rust
//! use bounded_pool::BoundedPool;
//!
//! // Two reusable 1 KiB scratch buffers.
//! let pool = BoundedPool::new(2, || Vec::<u8>::with_capacity(1024));
//!
//! let mut lease = pool.acquire().expect("pool starts with all resources idle");
//! lease.extend_from_slice(b"scratch data");
//!
//! // Returning the lease resets the buffer for the next borrower.
//! pool.release(lease).expect("lease belongs to this pool");
//!
//! let lease = pool.acquire().expect("released resource is idle again");
//! assert!(lease.is_empty());
//! ```

mod constants;
mod error;
mod lease;
mod pool;
mod raw_pool;
mod reusable;

pub(crate) use constants::*;
pub use error::*;
pub use lease::Lease;
pub use pool::BoundedPool;
pub use raw_pool::RawBoundedPool;
pub use reusable::Reusable;
