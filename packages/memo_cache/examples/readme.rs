//! Example from the package README.

use memo_cache::MemoCache;

fn main() {
    // An expensive pure function of its key.
    let cache = MemoCache::new(|n: &u64| Ok::<_, std::convert::Infallible>(n * n));

    assert_eq!(cache.get(&12).unwrap(), 144);

    // The second lookup is a cache hit; the compute function does not run again.
    assert_eq!(cache.get(&12).unwrap(), 144);

    println!("Computed once, served twice.");
}
