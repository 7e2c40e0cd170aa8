//! Beta-Bernoulli estimation primitives for fluent-check.
//!
//! Everything here is pure: special functions, Beta quantiles and the
//! sequential [`BetaPosterior`] used by size estimation and the confidence
//! engine.

pub mod math;

pub use math::stable::*;
pub use math::beta::*;
pub use math::bernoulli;
pub use math::binomial;
pub use math::error::MathError;
pub use math::posterior::*;
