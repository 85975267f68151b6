//! Basic benchmarks for the `bounded_pool` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use bounded_pool::BoundedPool;
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const BUFFER_CAPACITY: usize = 64 * 1024;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("bp_basic");

    group.bench_function("build_16", |b| {
        b.iter(|| {
            black_box(BoundedPool::new(16, || {
                Vec::<u8>::with_capacity(BUFFER_CAPACITY)
            }))
        });
    });

    group.bench_function("acquire_release", |b| {
        let pool = BoundedPool::new(16, || Vec::<u8>::with_capacity(BUFFER_CAPACITY));

        b.iter(|| {
            let lease = pool.acquire().expect("pool has idle capacity");
            black_box(&*lease);
            pool.release(lease).expect("lease belongs to this pool");
        });
    });

    group.bench_function("acquire_drop", |b| {
        let pool = BoundedPool::new(16, || Vec::<u8>::with_capacity(BUFFER_CAPACITY));

        b.iter(|| {
            let lease = pool.acquire().expect("pool has idle capacity");
            black_box(&*lease);
        });
    });

    group.finish();
}
