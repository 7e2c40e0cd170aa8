//! Fuzz target for Beta quantiles and credible intervals.

#![no_main]

use arbitrary::Arbitrary;
use fc_math::bernoulli::BetaParams;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    alpha: f64,
    beta: f64,
    p: f64,
}

fuzz_target!(|input: Input| {
    let Some(params) = BetaParams::new(input.alpha, input.beta) else {
        return;
    };
    if let Ok(q) = params.quantile(input.p) {
        assert!((0.0..=1.0).contains(&q), "quantile {q} for {input:?}");
    }
    let median = params.median();
    assert!((0.0..=1.0).contains(&median), "median {median} for {input:?}");
});
