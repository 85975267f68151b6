//! Basic usage of the `bounded_pool` crate:
//!
//! * Creating a pool of pre-allocated buffers.
//! * Checking buffers out and observing exhaustion.
//! * Returning buffers and seeing them come back reset.

use bounded_pool::BoundedPool;

fn main() {
    // Four reusable 64 KiB scratch buffers, allocated up front.
    let pool = BoundedPool::new(4, || Vec::<u8>::with_capacity(64 * 1024));

    println!(
        "Pool created: capacity {}, idle {}",
        pool.capacity(),
        pool.idle_count()
    );

    let mut lease = pool.acquire().expect("all resources start idle");
    lease.extend_from_slice(b"some payload being assembled");

    println!(
        "Checked out one buffer ({} bytes written), idle {}, in use {}",
        lease.len(),
        pool.idle_count(),
        pool.in_use_count()
    );

    // Exhaust the pool. Acquisition is non-blocking - exhaustion is a signal, not a stall.
    let others: Vec<_> = std::iter::from_fn(|| pool.acquire()).collect();
    println!(
        "Checked out {} more buffers; next acquire returns None: {}",
        others.len(),
        pool.acquire().is_none()
    );

    // Returning a lease resets the buffer for the next borrower.
    pool.release(lease).expect("lease belongs to this pool");

    let lease = pool.acquire().expect("released buffer is idle again");
    println!(
        "Reacquired buffer is empty again: {} (capacity kept: {})",
        lease.is_empty(),
        lease.capacity() >= 64 * 1024
    );
}
