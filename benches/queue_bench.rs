//! Benchmarks for the worker pool's admission and dispatch paths.
//!
//! Covers plain `DynamicValue` construction/extraction overhead, FIXED-mode
//! submit-then-get round trips at increasing fan-out, and CACHED-mode
//! elastic growth under a submission burst.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use prometheus_parking_lot::{DynamicValue, Mode, Pool};

fn bench_dynamic_value_round_trip(c: &mut Criterion) {
    c.bench_function("dynamic_value_new_extract_i32", |b| {
        b.iter(|| {
            let value = DynamicValue::new(black_box(42i32));
            black_box(value.extract::<i32>().unwrap())
        });
    });
}

fn bench_fixed_pool_submit_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_pool_submit_get");

    for size in [10, 100, 1_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let pool = Pool::new();
            pool.start_with(4).expect("default configuration is always valid");

            b.iter(|| {
                let handles: Vec<_> = (0..size)
                    .map(|i| pool.submit(move || DynamicValue::new(i)))
                    .collect();
                for handle in handles {
                    black_box(handle.get());
                }
            });
        });
    }
    group.finish();
}

fn bench_cached_pool_burst_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_pool_burst_growth");

    group.bench_function("burst_of_64_from_2_workers", |b| {
        b.iter(|| {
            let pool = Pool::new();
            pool.set_mode(Mode::Cached);
            pool.set_max_workers(32);
            pool.start_with(2).expect("default configuration is always valid");

            let handles: Vec<_> = (0..64)
                .map(|i| pool.submit(move || DynamicValue::new(i)))
                .collect();
            for handle in handles {
                black_box(handle.get());
            }
        });
    });
    group.finish();
}

criterion_group!(
    pool_benches,
    bench_dynamic_value_round_trip,
    bench_fixed_pool_submit_get,
    bench_cached_pool_burst_growth
);

criterion_main!(pool_benches);
