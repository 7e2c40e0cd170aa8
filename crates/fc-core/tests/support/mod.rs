//! Shared helpers for the statistical integration tests.

#![allow(dead_code)]

use fc_core::{EstimatorSettings, SizeEstimate};

/// Default settings with a per-trial seed.
pub fn seeded(seed: u64) -> EstimatorSettings {
    EstimatorSettings::default().with_seed(seed)
}

/// Number of values in `[min, max]` satisfying `pred`.
pub fn count_where(min: i64, max: i64, pred: impl Fn(i64) -> bool) -> u64 {
    (min..=max).filter(|v| pred(*v)).count() as u64
}

/// Share of `trials` seeds for which `estimate(seed)` covers `truth`.
pub fn coverage(trials: u64, truth: f64, mut estimate: impl FnMut(u64) -> SizeEstimate) -> f64 {
    let hits = (0..trials).filter(|&seed| estimate(seed).contains(truth)).count();
    hits as f64 / trials as f64
}

/// Mean interval width over `trials` seeds.
pub fn mean_width(trials: u64, mut estimate: impl FnMut(u64) -> SizeEstimate) -> f64 {
    (0..trials).map(|seed| estimate(seed).width()).sum::<f64>() / trials as f64
}
