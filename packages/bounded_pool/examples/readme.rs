//! Example from the package README.

use bounded_pool::BoundedPool;

fn main() {
    // Two reusable 1 KiB scratch buffers.
    let pool = BoundedPool::new(2, || Vec::<u8>::with_capacity(1024));

    let mut lease = pool.acquire().expect("pool starts with all resources idle");
    lease.extend_from_slice(b"scratch data");

    // Returning the lease resets the buffer for the next borrower.
    pool.release(lease).expect("lease belongs to this pool");

    let lease = pool.acquire().expect("released resource is idle again");
    assert!(lease.is_empty());

    println!("Buffer was reset on return, as expected.");
}
