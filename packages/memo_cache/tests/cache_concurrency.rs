//! Integration tests for the `memo_cache` package.
//!
//! These tests exercise the cache under real multi-threaded contention and verify the
//! at-most-once computation guarantee, failure sharing between waiters, bounded waiting
//! and recovery from a panicking compute function.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use memo_cache::{CacheError, MemoCache};

#[test]
fn concurrent_first_access_computes_once() {
    const THREADS: usize = 16;

    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(THREADS));

    let cache = {
        let calls = Arc::clone(&calls);
        Arc::new(MemoCache::new(move |n: &u64| {
            calls.fetch_add(1, Ordering::SeqCst);
            // Stay in flight long enough for every contender to arrive.
            thread::sleep(Duration::from_millis(100));
            Ok::<_, std::convert::Infallible>(n * 7)
        }))
    };

    let mut handles = Vec::with_capacity(THREADS);

    for _ in 0..THREADS {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            barrier.wait();
            cache.get(&6).unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 42);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn waiters_observe_the_shared_failure() {
    const WAITERS: usize = 4;

    let calls = Arc::new(AtomicUsize::new(0));
    let computing = Arc::new(AtomicBool::new(false));

    let cache = {
        let calls = Arc::clone(&calls);
        let computing = Arc::clone(&computing);
        Arc::new(MemoCache::new(move |_n: &u64| {
            calls.fetch_add(1, Ordering::SeqCst);
            computing.store(true, Ordering::SeqCst);
            // Keep the failure in flight while the waiters line up.
            thread::sleep(Duration::from_millis(200));
            Err::<u64, _>("backend unavailable")
        }))
    };

    let computer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.get(&1))
    };

    // Only start the waiters once the computation is definitely in flight.
    while !computing.load(Ordering::SeqCst) {
        thread::yield_now();
    }

    let waiters: Vec<_> = (0..WAITERS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get(&1))
        })
        .collect();

    let computer_result = computer.join().unwrap();
    assert!(matches!(
        computer_result,
        Err(CacheError::Compute { .. })
    ));

    for waiter in waiters {
        let result = waiter.join().unwrap();
        let error = result.expect_err("waiters share the computer's failure");
        let CacheError::Compute { source } = error else {
            panic!("expected a compute failure");
        };
        assert_eq!(source.to_string(), "backend unavailable");
    }

    // One computation served the computer and all waiters.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_empty());
}

#[test]
fn bounded_wait_expires_without_disturbing_the_computation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let computing = Arc::new(AtomicBool::new(false));

    let cache = {
        let calls = Arc::clone(&calls);
        let computing = Arc::clone(&computing);
        Arc::new(MemoCache::new(move |n: &u64| {
            calls.fetch_add(1, Ordering::SeqCst);
            computing.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(300));
            Ok::<_, std::convert::Infallible>(n + 1)
        }))
    };

    let computer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.get(&1))
    };

    while !computing.load(Ordering::SeqCst) {
        thread::yield_now();
    }

    // The impatient waiter gives up quickly...
    let result = cache.get_for(&1, Duration::from_millis(10));
    assert!(matches!(result, Err(CacheError::Timeout)));

    // ...while the in-flight computation still resolves for everyone else.
    assert_eq!(computer.join().unwrap().unwrap(), 2);
    assert_eq!(cache.get(&1).unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_compute_releases_waiters_and_allows_retry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let computing = Arc::new(AtomicBool::new(false));

    let cache = {
        let calls = Arc::clone(&calls);
        let computing = Arc::clone(&computing);
        Arc::new(MemoCache::new(move |n: &u64| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            computing.store(true, Ordering::SeqCst);
            if attempt == 0 {
                thread::sleep(Duration::from_millis(200));
                panic!("compute function exploded");
            }
            Ok::<_, std::convert::Infallible>(n + 41)
        }))
    };

    let computer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.get(&1))
    };

    while !computing.load(Ordering::SeqCst) {
        thread::yield_now();
    }

    // This waiter parks behind the panicking computer, wakes to find no outcome and
    // retries from vacant, becoming the new computer.
    let value = cache.get(&1).unwrap();
    assert_eq!(value, 42);

    // The original computer's panic propagates to whoever joined it.
    assert!(computer.join().is_err());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
