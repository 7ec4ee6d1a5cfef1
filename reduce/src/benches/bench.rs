use commonware_reduce::{Parallel, Pool, Sequential, Strategy};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rayon::ThreadPoolBuilder;
use std::{hint::black_box, sync::Arc};

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    let parallel = Parallel::default();
    let pool = Pool::from(Arc::new(ThreadPoolBuilder::new().build().unwrap()));

    for &n in &[1_000u64, 100_000, 10_000_000] {
        let data: Vec<u64> = (0..n).collect();

        group.bench_with_input(BenchmarkId::new("sequential", n), &data, |b, data| {
            b.iter(|| {
                Sequential
                    .reduce(black_box(data), 0u64, |acc, &x| acc.wrapping_add(x))
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", n), &data, |b, data| {
            b.iter(|| {
                parallel
                    .reduce(black_box(data), 0u64, |acc, &x| acc.wrapping_add(x))
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("pool", n), &data, |b, data| {
            b.iter(|| {
                pool.reduce(black_box(data), 0u64, |acc, &x| acc.wrapping_add(x))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reduce);
criterion_main!(benches);
