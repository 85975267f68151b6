//! Integration tests for the `bounded_pool` package.
//!
//! These tests exercise the pool under real multi-threaded contention and verify the
//! capacity bound, the reset-on-return guarantee and cross-thread release behavior.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use bounded_pool::{BoundedPool, Reusable};

/// A resource that records how many concurrent holders exist, so tests can verify the
/// capacity bound is never exceeded.
struct TrackedBuffer {
    data: Vec<u8>,
    holders: Arc<AtomicUsize>,
}

impl Reusable for TrackedBuffer {
    fn reset(&mut self) {
        self.data.clear();
    }
}

#[test]
fn capacity_bound_holds_under_contention() {
    const CAPACITY: usize = 4;
    const THREADS: usize = 16;
    const ITERATIONS: usize = 200;

    let concurrent = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let pool = {
        let concurrent = Arc::clone(&concurrent);
        BoundedPool::new(CAPACITY, move || TrackedBuffer {
            data: Vec::with_capacity(256),
            holders: Arc::clone(&concurrent),
        })
    };

    let mut handles = Vec::with_capacity(THREADS);

    for _ in 0..THREADS {
        let pool = pool.clone();
        let peak = Arc::clone(&peak);

        handles.push(thread::spawn(move || {
            for _ in 0..ITERATIONS {
                let Some(mut lease) = pool.acquire() else {
                    // Exhaustion is a normal outcome; try again.
                    thread::yield_now();
                    continue;
                };

                let now = lease.holders.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);

                // Every borrower must see a fresh buffer.
                assert!(lease.data.is_empty(), "observed a stale buffer");
                lease.data.extend_from_slice(b"in use");

                lease.holders.fetch_sub(1, Ordering::SeqCst);
                pool.release(lease).expect("lease belongs to this pool");
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(
        peak.load(Ordering::SeqCst) <= CAPACITY,
        "more than {CAPACITY} resources were simultaneously checked out"
    );
    assert_eq!(pool.idle_count(), CAPACITY);
    assert_eq!(pool.in_use_count(), 0);
}

#[test]
fn lease_can_migrate_between_threads_before_release() {
    let pool = BoundedPool::new(1, || Vec::<u8>::with_capacity(128));

    let (tx, rx) = mpsc::channel();

    let mut lease = pool.acquire().expect("pool starts idle");
    lease.extend_from_slice(b"filled on the main thread");
    tx.send(lease).unwrap();

    let pool_clone = pool.clone();
    thread::spawn(move || {
        let lease = rx.recv().unwrap();
        assert_eq!(&**lease, b"filled on the main thread");
        pool_clone
            .release(lease)
            .expect("lease belongs to this pool");
    })
    .join()
    .unwrap();

    let lease = pool.acquire().expect("resource was returned");
    assert!(lease.is_empty());
}

#[test]
fn teardown_drops_all_resources_at_once() {
    static LIVE: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Counted {
        fn new() -> Self {
            LIVE.fetch_add(1, Ordering::SeqCst);
            Self
        }
    }

    impl Reusable for Counted {
        fn reset(&mut self) {}
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            LIVE.fetch_sub(1, Ordering::SeqCst);
        }
    }

    {
        let pool = BoundedPool::new(8, Counted::new);
        assert_eq!(LIVE.load(Ordering::SeqCst), 8);

        // An outstanding lease keeps its resource (and the pool) alive past the handle.
        let lease = pool.acquire().expect("pool starts idle");
        drop(pool);
        assert_eq!(LIVE.load(Ordering::SeqCst), 8);
        drop(lease);
    }

    assert_eq!(LIVE.load(Ordering::SeqCst), 0);
}
