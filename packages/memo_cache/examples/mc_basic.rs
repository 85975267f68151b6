//! Basic usage of the `memo_cache` crate:
//!
//! * Binding a cache to a compute function.
//! * Observing that repeated lookups do not recompute.
//! * Sharing one in-flight computation between concurrent callers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

fn main() {
    let calls = Arc::new(AtomicUsize::new(0));

    let cache = {
        let calls = Arc::clone(&calls);
        Arc::new(memo_cache::MemoCache::new(move |n: &u64| {
            calls.fetch_add(1, Ordering::SeqCst);
            // Stand-in for an expensive derivation.
            thread::sleep(Duration::from_millis(50));
            Ok::<_, std::convert::Infallible>(n * n)
        }))
    };

    // Eight threads race on the same key; the computation runs once.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get(&12).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 144);
    }

    println!(
        "8 concurrent lookups, {} computation(s), cache holds {} entry",
        calls.load(Ordering::SeqCst),
        cache.len()
    );

    // A second lookup is a pure cache hit.
    assert_eq!(cache.get(&12).unwrap(), 144);
    println!(
        "After another lookup, still {} computation(s)",
        calls.load(Ordering::SeqCst)
    );
}
