//! Warm-start versus cold-start after shrinking a filter.

mod support;

use fc_core::{integer, Arbitrary, ArbitraryExt, BoxedArbitrary, Pick, SizeEstimate};
use support::{count_where, coverage, mean_width, seeded};

const TRIALS: u64 = 300;

fn shrunk_size(seed: u64, scale: f64, pred: fn(&i64) -> bool, at: i64) -> SizeEstimate {
    let settings = seeded(seed).with_warm_start_scale(scale).unwrap();
    let parent: BoxedArbitrary<i64> = integer(0, 1000).filter(pred, &settings);
    parent.shrink(&Pick::new(at)).size()
}

fn even(v: &i64) -> bool {
    v % 2 == 0
}

fn below_250(v: &i64) -> bool {
    *v < 250
}

#[test]
fn same_pass_rate_warm_start_is_narrower() {
    // shrinking at 600 leaves [0, 599]
    let truth = count_where(0, 599, |v| even(&v)) as f64;
    let cold = |seed| shrunk_size(seed, 0.0, even, 600);
    let warm = |seed| shrunk_size(seed, 1.0, even, 600);

    assert!(mean_width(TRIALS, warm) < mean_width(TRIALS, cold));
    let warm_cov = coverage(TRIALS, truth, warm);
    let cold_cov = coverage(TRIALS, truth, cold);
    assert!(warm_cov >= 0.85, "warm coverage {warm_cov}");
    assert!(cold_cov >= 0.85, "cold coverage {cold_cov}");
}

#[test]
fn changed_pass_rate_biases_warm_start() {
    // every value in [0, 199] is below 250
    let truth = 200.0;
    for seed in 0..50 {
        let cold = shrunk_size(seed, 0.0, below_250, 200);
        let warm = shrunk_size(seed, 1.0, below_250, 200);
        assert!(cold.upper() >= 0.99 * truth, "cold {cold}");
        assert!(warm.upper() < 0.8 * truth, "warm {warm}");
    }
}

#[test]
fn partial_scale_sits_between() {
    let width = |scale| mean_width(100, |seed| shrunk_size(seed, scale, even, 600));
    let (cold, half, full) = (width(0.0), width(0.5), width(1.0));
    assert!(full < half && half < cold, "{full} {half} {cold}");
}

#[test]
fn shrinking_leaves_parent_untouched() {
    let settings = seeded(4).with_warm_start_scale(1.0).unwrap();
    let parent = integer(0, 1000).filter(even, &settings);
    let before = parent.size();
    let _child = parent.shrink(&Pick::new(600));
    assert_eq!(parent.size(), before);
}

#[test]
fn repeated_shrinks_stay_within_shrunk_space() {
    let settings = seeded(8).with_warm_start_scale(0.5).unwrap();
    let mut gen = integer(0, 1000).filter(even, &settings);
    for at in [800i64, 400, 100, 20] {
        gen = gen.shrink(&Pick::new(at));
        assert!(gen.size().upper() <= at as f64, "after shrinking at {at}: {}", gen.size());
    }
}
