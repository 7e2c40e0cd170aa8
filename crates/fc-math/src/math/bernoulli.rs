//! Beta-Bernoulli conjugate model for binary outcomes.
//!
//! The model uses:
//! - Prior: `p ~ Beta(α, β)`
//! - Likelihood: `x | p ~ Bernoulli(p)` (a filter predicate passing, a property holding)
//! - Posterior after k successes in n trials: `p | data ~ Beta(α + k, β + n - k)`
//!
//! Stateful updates live in [`BetaPosterior`](super::posterior::BetaPosterior).

use serde::{Deserialize, Serialize};

use super::beta::{beta_inv_cdf, beta_mean, beta_median, beta_mode, beta_var};
use super::error::MathError;

/// Parameters for a Beta distribution used in Beta-Bernoulli conjugate updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Shape parameter alpha (successes + prior)
    pub alpha: f64,
    /// Shape parameter beta (failures + prior)
    pub beta: f64,
}

impl BetaParams {
    /// Create new Beta parameters with validation.
    ///
    /// Returns None if parameters are invalid (non-positive, infinite or NaN).
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return None;
        }
        Some(Self { alpha, beta })
    }

    /// Like [`BetaParams::new`], reporting why the parameters were rejected.
    pub fn try_new(alpha: f64, beta: f64) -> Result<Self, MathError> {
        Self::new(alpha, beta).ok_or(MathError::InvalidPrior { alpha, beta })
    }

    /// The Beta(2, 1) prior used for filter pass rates.
    ///
    /// It leans towards "most candidates pass", so an unexercised filter
    /// reports a size close to its base rather than close to zero.
    pub fn optimistic() -> Self {
        Self {
            alpha: 2.0,
            beta: 1.0,
        }
    }

    /// Create Beta(1, 1) uniform prior.
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Create a Jeffreys prior Beta(0.5, 0.5).
    pub fn jeffreys() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
        }
    }

    /// alpha + beta.
    pub fn concentration(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Posterior mean E[p] = α / (α + β).
    pub fn mean(&self) -> f64 {
        beta_mean(self.alpha, self.beta)
    }

    /// Posterior variance Var[p] = αβ / ((α+β)²(α+β+1)).
    pub fn variance(&self) -> f64 {
        beta_var(self.alpha, self.beta)
    }

    /// Posterior mode, see [`beta_mode`] for the boundary conventions.
    pub fn mode(&self) -> f64 {
        beta_mode(self.alpha, self.beta)
    }

    /// Posterior median.
    pub fn median(&self) -> f64 {
        beta_median(self.alpha, self.beta)
    }

    /// Quantile (inverse CDF) at `p`, which must lie in [0, 1].
    pub fn quantile(&self, p: f64) -> Result<f64, MathError> {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return Err(MathError::InvalidProbability(p));
        }
        Ok(beta_inv_cdf(p, self.alpha, self.beta))
    }
}

/// Compute an equal-tailed credible interval for the probability parameter.
///
/// `level` must lie in [0, 1]; level 0 collapses to the median, level 1
/// spans [0, 1].
pub fn credible_interval(posterior: &BetaParams, level: f64) -> Result<(f64, f64), MathError> {
    if level.is_nan() || !(0.0..=1.0).contains(&level) {
        return Err(MathError::InvalidLevel(level));
    }

    let tail = (1.0 - level) / 2.0;
    let lower = beta_inv_cdf(tail, posterior.alpha, posterior.beta);
    let upper = beta_inv_cdf(1.0 - tail, posterior.alpha, posterior.beta);

    Ok((lower, upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() && b.is_nan() {
            return true; // Both NaN is considered equal for testing
        }
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    // =======================================================================
    // BetaParams tests
    // =======================================================================

    #[test]
    fn beta_params_new_valid() {
        let p = BetaParams::new(2.0, 3.0).unwrap();
        assert_eq!(p.alpha, 2.0);
        assert_eq!(p.beta, 3.0);
    }

    #[test]
    fn beta_params_new_invalid() {
        assert!(BetaParams::new(0.0, 1.0).is_none());
        assert!(BetaParams::new(-1.0, 1.0).is_none());
        assert!(BetaParams::new(1.0, 0.0).is_none());
        assert!(BetaParams::new(f64::NAN, 1.0).is_none());
        assert!(BetaParams::new(f64::INFINITY, 1.0).is_none());
        assert!(matches!(
            BetaParams::try_new(0.0, 1.0),
            Err(MathError::InvalidPrior { .. })
        ));
    }

    #[test]
    fn named_priors() {
        assert_eq!(BetaParams::optimistic(), BetaParams::new(2.0, 1.0).unwrap());
        assert!(approx_eq(BetaParams::uniform().mean(), 0.5, 1e-12));
        assert!(approx_eq(BetaParams::jeffreys().mean(), 0.5, 1e-12));
        assert!(approx_eq(BetaParams::optimistic().mean(), 2.0 / 3.0, 1e-12));
    }

    #[test]
    fn beta_params_mean_and_variance() {
        let p = BetaParams::new(2.0, 5.0).unwrap();
        assert!(approx_eq(p.mean(), 2.0 / 7.0, 1e-12));
        // Var = 2*5 / (7^2 * 8) = 10 / 392
        assert!(approx_eq(p.variance(), 10.0 / 392.0, 1e-12));
    }

    #[test]
    fn quantile_rejects_out_of_range_probability() {
        let p = BetaParams::uniform();
        assert!(matches!(
            p.quantile(1.5),
            Err(MathError::InvalidProbability(_))
        ));
        assert!(p.quantile(f64::NAN).is_err());
        assert!(approx_eq(p.quantile(0.3).unwrap(), 0.3, 1e-10));
    }

    // =======================================================================
    // credible interval tests
    // =======================================================================

    #[test]
    fn credible_interval_symmetric_posterior() {
        let post = BetaParams::new(10.0, 10.0).unwrap();
        let (lo, hi) = credible_interval(&post, 0.9).unwrap();
        assert!(approx_eq(lo + hi, 1.0, 1e-9));
        assert!(lo < 0.5 && hi > 0.5);
    }

    #[test]
    fn credible_interval_level_edges() {
        let post = BetaParams::new(3.0, 7.0).unwrap();
        let (lo, hi) = credible_interval(&post, 1.0).unwrap();
        assert_eq!((lo, hi), (0.0, 1.0));
        let (lo, hi) = credible_interval(&post, 0.0).unwrap();
        assert!(approx_eq(lo, hi, 1e-12));
        assert!(approx_eq(lo, post.median(), 1e-9));
    }

    #[test]
    fn credible_interval_invalid_level() {
        let post = BetaParams::uniform();
        assert!(matches!(
            credible_interval(&post, 1.2),
            Err(MathError::InvalidLevel(_))
        ));
        assert!(credible_interval(&post, -0.1).is_err());
        assert!(credible_interval(&post, f64::NAN).is_err());
    }

    #[test]
    fn interval_shifts_up_with_successes() {
        let mut last = 0.0;
        for k in 0..=20 {
            let post = BetaParams::new(1.0 + k as f64, 21.0 - k as f64).unwrap();
            let (lo, _) = credible_interval(&post, 0.9).unwrap();
            assert!(lo > last);
            last = lo;
        }
    }
}
