//! Value distribution of `integer(1, 10).chain(|k| integer(1, k))`.
//!
//! Weighting parents by child size makes every `(k, j)` pair with
//! `1 <= j <= k <= 10` equally likely, so `P(j) = (11 - j) / 55`.

mod support;

use fc_core::{integer, Arbitrary, ArbitraryExt, BoxedArbitrary, Draw};
use rand::rngs::StdRng;
use rand::SeedableRng;
use support::seeded;

const SAMPLES: usize = 20_000;

fn frequencies(gen: &mut BoxedArbitrary<i64>, seed: u64) -> [f64; 10] {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts = [0usize; 10];
    let mut drawn = 0;
    while drawn < SAMPLES {
        if let Draw::Picked(p) = gen.pick(&mut rng) {
            counts[(p.value - 1) as usize] += 1;
            drawn += 1;
        }
    }
    counts.map(|c| c as f64 / SAMPLES as f64)
}

fn triangular(j: usize) -> f64 {
    (10 - j) as f64 / 55.0
}

#[test]
fn chained_values_follow_triangular_law() {
    let mut gen = integer(1, 10).chain(|k| integer(1, *k), &seeded(3));
    let freq = frequencies(&mut gen, 11);
    for (j, p) in freq.iter().enumerate() {
        let expected = triangular(j);
        assert!((p - expected).abs() <= 0.015, "P({}) = {p}, expected {expected}", j + 1);
    }
}

#[test]
fn differs_from_uniform_parent_sampling() {
    // a uniform parent gives P(1) = H(10) / 10
    let uniform_p1: f64 = (1..=10).map(|k| 1.0 / k as f64).sum::<f64>() / 10.0;
    let mut gen = integer(1, 10).chain(|k| integer(1, *k), &seeded(5));
    let freq = frequencies(&mut gen, 13);
    assert!((freq[0] - triangular(0)).abs() < (freq[0] - uniform_p1).abs());
    assert!(uniform_p1 - freq[0] > 0.08);
}

#[test]
fn chain_size_brackets_pair_count() {
    for seed in 0..20 {
        let s = integer(1, 10).chain(|k| integer(1, *k), &seeded(seed)).size();
        assert!(s.lower() <= s.value() && s.value() <= s.upper(), "{s}");
        assert!(s.upper() <= 10.0, "{s}");
    }
}

#[test]
fn picks_carry_both_halves() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut gen = integer(1, 10).chain(|k| integer(1, *k), &seeded(2));
    for _ in 0..200 {
        if let Some(p) = gen.pick(&mut rng).into_pick() {
            assert!(gen.can_generate(&p));
            let origin = p.original::<fc_core::arbitrary::ChainOrigin<i64, i64>>().unwrap();
            assert!(origin.child.value <= origin.parent.value);
        }
    }
}
