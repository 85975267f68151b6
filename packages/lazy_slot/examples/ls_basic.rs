//! Basic usage of the `lazy_slot` crate:
//!
//! * Binding a slot to a factory.
//! * Observing that construction is deferred and happens once.
//! * Sharing the constructed instance between concurrent callers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lazy_slot::LazySlot;

struct Settings {
    worker_threads: usize,
}

fn main() {
    let calls = Arc::new(AtomicUsize::new(0));

    let slot = {
        let calls = Arc::clone(&calls);
        Arc::new(LazySlot::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            // Stand-in for reading files, probing hardware, etc.
            thread::sleep(Duration::from_millis(50));
            Ok::<_, std::convert::Infallible>(Settings { worker_threads: 8 })
        }))
    };

    // Nothing has been constructed yet.
    assert!(slot.try_get().is_none());

    // Eight threads race on the first access; the factory runs once.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let slot = Arc::clone(&slot);
            thread::spawn(move || slot.get().unwrap())
        })
        .collect();

    let instances: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    // Every caller received the same shared instance.
    assert!(
        instances
            .iter()
            .all(|settings| Arc::ptr_eq(settings, &instances[0]))
    );

    println!(
        "8 concurrent accesses, {} construction(s), worker_threads = {}",
        calls.load(Ordering::SeqCst),
        instances[0].worker_threads
    );
}
