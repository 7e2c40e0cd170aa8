//! Size estimates and the rules that compose them.
//!
//! A [`SizeEstimate`] is the common currency between generators: leaves with
//! an enumerable domain report `Exact`, anything whose domain is inferred
//! from samples reports `Estimated` with a credible interval. Combinators fold
//! their children's estimates with the rules below.
//!
//! | Combinator | Value | Interval |
//! |---|---|---|
//! | tuple / product | `Π value` | `(Π lower, Π upper)` |
//! | union / sum | `Σ value` | `(Σ lower, Σ upper)` |
//! | filter / scale | `base · rate` | `(base.lower · lo, base.upper · hi)`, clamped to `[0, base.upper]` |
//! | chain | mean child value | `(min child lower, max child upper)` |
//!
//! Interval arithmetic over bounds assumes every factor sits at its extreme
//! at once, so composed intervals over-cover rather than under-cover.

use serde::{Deserialize, Serialize};

/// Number of distinct values a generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizeEstimate {
    /// Domain fully known.
    Exact { value: u64 },
    /// Inferred domain: `value` is a posterior median and
    /// `lower <= value <= upper`.
    Estimated {
        value: f64,
        credible_interval: (f64, f64),
    },
}

impl SizeEstimate {
    pub const EMPTY: SizeEstimate = SizeEstimate::Exact { value: 0 };

    pub fn exact(value: u64) -> Self {
        SizeEstimate::Exact { value }
    }

    /// An estimate with its bounds normalized so that
    /// `0 <= lower <= value <= upper` and nothing is NaN.
    pub fn estimated(value: f64, interval: (f64, f64)) -> Self {
        let finite_or = |x: f64, fallback: f64| if x.is_nan() { fallback } else { x };
        let value = finite_or(value, 0.0).max(0.0);
        let lower = finite_or(interval.0, value).max(0.0).min(value);
        let upper = finite_or(interval.1, value).max(value);
        SizeEstimate::Estimated {
            value,
            credible_interval: (lower, upper),
        }
    }

    /// Exact count, degrading to a zero-width estimate beyond `u64`.
    pub fn from_count(count: u128) -> Self {
        match u64::try_from(count) {
            Ok(value) => SizeEstimate::Exact { value },
            Err(_) => {
                let v = count as f64;
                SizeEstimate::estimated(v, (v, v))
            }
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            SizeEstimate::Exact { value } => value as f64,
            SizeEstimate::Estimated { value, .. } => value,
        }
    }

    /// `(lower, upper)`; zero width for exact sizes.
    pub fn interval(&self) -> (f64, f64) {
        match *self {
            SizeEstimate::Exact { value } => (value as f64, value as f64),
            SizeEstimate::Estimated {
                credible_interval, ..
            } => credible_interval,
        }
    }

    pub fn lower(&self) -> f64 {
        self.interval().0
    }

    pub fn upper(&self) -> f64 {
        self.interval().1
    }

    pub fn width(&self) -> f64 {
        let (lo, hi) = self.interval();
        hi - lo
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, SizeEstimate::Exact { .. })
    }

    /// `Exact { value: 0 }`.
    pub fn is_empty(&self) -> bool {
        matches!(self, SizeEstimate::Exact { value: 0 })
    }

    /// Whether `count` lies inside the interval.
    pub fn contains(&self, count: f64) -> bool {
        let (lo, hi) = self.interval();
        lo <= count && count <= hi
    }
}

impl std::fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeEstimate::Exact { value } => write!(f, "{}", value),
            SizeEstimate::Estimated {
                value,
                credible_interval: (lo, hi),
            } => write!(f, "~{:.1} [{:.1}, {:.1}]", value, lo, hi),
        }
    }
}

/// Product rule for independent factors.
///
/// An empty factor makes the product `Exact(0)`; all-exact factors stay exact.
pub fn product<I>(sizes: I) -> SizeEstimate
where
    I: IntoIterator<Item = SizeEstimate>,
{
    let sizes: Vec<SizeEstimate> = sizes.into_iter().collect();
    if sizes.iter().any(SizeEstimate::is_empty) {
        return SizeEstimate::EMPTY;
    }

    if sizes.iter().all(SizeEstimate::is_exact) {
        let mut total: u128 = 1;
        for s in &sizes {
            match total.checked_mul(s.value() as u128) {
                Some(t) => total = t,
                None => return exact_overflow(&sizes, |acc, x| acc * x, 1.0),
            }
        }
        return SizeEstimate::from_count(total);
    }

    let (mut value, mut lo, mut hi) = (1.0, 1.0, 1.0);
    for s in &sizes {
        value *= s.value();
        lo *= s.lower();
        hi *= s.upper();
    }
    SizeEstimate::estimated(value, (lo, hi))
}

/// Sum rule for disjoint branches. Empty branches contribute nothing.
pub fn sum<I>(sizes: I) -> SizeEstimate
where
    I: IntoIterator<Item = SizeEstimate>,
{
    let sizes: Vec<SizeEstimate> = sizes.into_iter().collect();

    if sizes.iter().all(SizeEstimate::is_exact) {
        let mut total: u128 = 0;
        for s in &sizes {
            match total.checked_add(s.value() as u128) {
                Some(t) => total = t,
                None => return exact_overflow(&sizes, |acc, x| acc + x, 0.0),
            }
        }
        return SizeEstimate::from_count(total);
    }

    let (mut value, mut lo, mut hi) = (0.0, 0.0, 0.0);
    for s in &sizes {
        value += s.value();
        lo += s.lower();
        hi += s.upper();
    }
    SizeEstimate::estimated(value, (lo, hi))
}

fn exact_overflow(sizes: &[SizeEstimate], op: fn(f64, f64) -> f64, unit: f64) -> SizeEstimate {
    let v = sizes.iter().map(SizeEstimate::value).fold(unit, op);
    SizeEstimate::estimated(v, (v, v))
}

/// `base` scaled by a rate in [0, 1] with credible interval `(lo, hi)`.
///
/// Exact bases scale their single value; estimated bases go through the
/// product rule. Bounds are clamped to `[0, base.upper]`.
pub fn scale(base: SizeEstimate, rate: f64, interval: (f64, f64)) -> SizeEstimate {
    if base.is_empty() {
        return SizeEstimate::EMPTY;
    }
    let cap = base.upper();
    let (lo, hi) = interval;
    SizeEstimate::estimated(
        (base.value() * rate).min(cap),
        ((base.lower() * lo).min(cap), (base.upper() * hi).min(cap)),
    )
}

/// Size of `k`-fold products of `base`.
pub fn power(base: SizeEstimate, k: usize) -> SizeEstimate {
    product(std::iter::repeat(base).take(k))
}

/// Bounds for a dependent chain from the child sizes seen across sampled
/// parent values.
///
/// The result is approximate: its value is the mean child size and its
/// interval spans the smallest lower bound to the largest upper bound.
/// No parents sampled means an empty chain.
pub fn chain_bounds(child_sizes: &[SizeEstimate]) -> SizeEstimate {
    if child_sizes.is_empty() {
        return SizeEstimate::EMPTY;
    }
    let n = child_sizes.len() as f64;
    let mean = child_sizes.iter().map(SizeEstimate::value).sum::<f64>() / n;
    let lo = child_sizes
        .iter()
        .map(SizeEstimate::lower)
        .fold(f64::INFINITY, f64::min);
    let hi = child_sizes
        .iter()
        .map(SizeEstimate::upper)
        .fold(0.0, f64::max);
    SizeEstimate::estimated(mean, (lo, hi))
}
