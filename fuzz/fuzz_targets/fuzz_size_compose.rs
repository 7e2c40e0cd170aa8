//! Fuzz target for size composition.
//!
//! Composed estimates must keep `0 <= lower <= value <= upper`.

#![no_main]

use arbitrary::Arbitrary;
use fc_core::size::{self, SizeEstimate};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum RawSize {
    Exact(u32),
    Estimated { value: u32, lower: u32, upper: u32 },
}

impl RawSize {
    fn build(&self) -> SizeEstimate {
        match *self {
            RawSize::Exact(v) => SizeEstimate::exact(u64::from(v)),
            RawSize::Estimated {
                value,
                lower,
                upper,
            } => SizeEstimate::estimated(f64::from(value), (f64::from(lower), f64::from(upper))),
        }
    }
}

fn check(s: SizeEstimate) {
    let (lo, hi) = s.interval();
    assert!(lo >= 0.0, "{s}");
    assert!(lo <= s.value() && s.value() <= hi, "{s}");
}

fuzz_target!(|input: (Vec<RawSize>, u8, u8)| {
    let sizes: Vec<SizeEstimate> = input.0.iter().take(8).map(RawSize::build).collect();
    check(size::product(sizes.clone()));
    check(size::sum(sizes.clone()));
    check(size::chain_bounds(&sizes));
    if let Some(first) = sizes.first() {
        let rate = f64::from(input.1) / 255.0;
        let spread = f64::from(input.2) / 510.0;
        check(size::scale(*first, rate, ((rate - spread).max(0.0), (rate + spread).min(1.0))));
        check(size::power(*first, usize::from(input.2 % 4)));
    }
});
