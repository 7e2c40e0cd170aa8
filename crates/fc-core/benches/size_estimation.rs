//! Criterion benchmarks for composed `size()` calls and filter construction.
//!
//! Everything is seeded so runs are comparable across machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fc_config::IntervalModel;
use fc_core::{integer, tuple, union, ArbitraryExt, BoxedArbitrary, EstimatorSettings};

fn settings() -> EstimatorSettings {
    EstimatorSettings::default().with_seed(0xBE7C)
}

fn nested_filters(depth: usize, settings: &EstimatorSettings) -> BoxedArbitrary<i64> {
    let mut gen = integer(0, 100_000);
    for level in 0..depth {
        let m = (level as i64 % 3) + 2;
        gen = gen.filter(move |v| v % m != 0, settings);
    }
    gen
}

fn bench_filter_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_size");
    for (name, model) in [
        ("scaled_beta", IntervalModel::ScaledBeta),
        ("beta_binomial", IntervalModel::BetaBinomial),
    ] {
        let s = settings().with_interval_model(model);
        let filter = integer(0, 10_000).filter(|v| v % 3 == 0, &s);
        group.bench_function(name, |b| b.iter(|| black_box(filter.size())));
    }
    group.finish();
}

fn bench_composed_size(c: &mut Criterion) {
    let s = settings();
    let mut group = c.benchmark_group("composed_size");
    for depth in [1usize, 3, 10] {
        let product = tuple(vec![nested_filters(depth, &s), nested_filters(depth, &s)]);
        group.bench_with_input(BenchmarkId::new("tuple", depth), &product, |b, g| {
            b.iter(|| black_box(g.size()));
        });
        let sum = union(vec![nested_filters(depth, &s), nested_filters(depth, &s)]);
        group.bench_with_input(BenchmarkId::new("union", depth), &sum, |b, g| {
            b.iter(|| black_box(g.size()));
        });
    }
    group.finish();
}

fn bench_filter_warm_up(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_construction");
    for samples in [10u32, 100, 500] {
        let s = settings().with_warm_up_samples(samples);
        group.bench_with_input(BenchmarkId::new("warm_up", samples), &s, |b, s| {
            b.iter(|| black_box(integer(0, 1000).filter(|v| v % 2 == 0, s).size()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_filter_size,
    bench_composed_size,
    bench_filter_warm_up
);
criterion_main!(benches);
