//! A concurrent memoization cache that computes each key at most once.
//!
//! This crate provides [`MemoCache`], a thread-safe result cache bound to a single compute
//! function. The first caller to ask for a key runs the computation; every concurrent caller
//! asking for the same key parks (no spinning) until that computation finishes and then
//! receives the same value. Once a key is resolved it is never recomputed.
//!
//! # Key features
//!
//! - **At-most-once computation**: for any key, the compute function runs exactly once no
//!   matter how many callers race on the first access.
//! - **Parked waiters**: callers that arrive while a computation is in flight block on an
//!   event, not a spin loop, and all observe the same outcome.
//! - **Failures are not cached**: a failed computation is surfaced to the computing caller
//!   and every waiter, then forgotten - a later call for the same key retries. Transient
//!   errors never become permanent.
//! - **Bounded waiting (optional)**: [`get_for()`][MemoCache::get_for] lets a waiting caller
//!   give up after a deadline without disturbing the in-flight computation.
//!
//! # Example
//!
//! ```rust
//! use memo_cache::MemoCache;
//!
//! // An expensive pure function of its key.
//! let cache = MemoCache::new(|n: &u64| Ok::<_, std::convert::Infallible>(n * n));
//!
//! assert_eq!(cache.get(&12).unwrap(), 144);
//!
//! // The second lookup is a cache hit; the compute function does not run again.
//! assert_eq!(cache.get(&12).unwrap(), 144);
//! ```
//!
//! The cache never evicts: the set of distinct keys is expected to be bounded by the
//! caller's usage. If it is not, wrap keys in a coarser descriptor or use a dedicated
//! caching crate with an eviction policy.

mod cache;
mod constants;
mod error;
mod in_flight;

pub use cache::MemoCache;
pub(crate) use constants::*;
pub use error::*;
pub(crate) use in_flight::*;
