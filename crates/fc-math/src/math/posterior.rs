//! Sequentially updated Beta posterior over an unknown Bernoulli rate.
//!
//! A [`BetaPosterior`] remembers the prior it started from so that the
//! accumulated evidence (`alpha - alpha0`, `beta - beta0`) can be inspected,
//! scaled and transferred to a fresh posterior. Shape parameters only ever
//! grow; a reset always constructs a new value.

use serde::{Deserialize, Serialize};

use super::beta::{beta_cdf, beta_inv_cdf, beta_median, beta_mode};
use super::bernoulli::{credible_interval, BetaParams};
use super::error::MathError;

/// Beta(alpha, beta) belief about a pass rate, updated one observation at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPosterior {
    prior: BetaParams,
    alpha: f64,
    beta: f64,
}

impl BetaPosterior {
    /// Start from the prior with no observations.
    pub fn new(prior: BetaParams) -> Self {
        Self {
            prior,
            alpha: prior.alpha,
            beta: prior.beta,
        }
    }

    /// Start from the prior plus already-accumulated evidence.
    ///
    /// `successes` and `failures` may be fractional but must be non-negative.
    pub fn with_evidence(
        prior: BetaParams,
        successes: f64,
        failures: f64,
    ) -> Result<Self, MathError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(successes) || !valid(failures) {
            return Err(MathError::InvalidPrior {
                alpha: prior.alpha + successes,
                beta: prior.beta + failures,
            });
        }
        Ok(Self {
            prior,
            alpha: prior.alpha + successes,
            beta: prior.beta + failures,
        })
    }

    /// Record one Bernoulli outcome.
    pub fn observe(&mut self, success: bool) {
        if success {
            self.alpha += 1.0;
        } else {
            self.beta += 1.0;
        }
    }

    /// Record a soft outcome `weight` in [0, 1]: `alpha += weight`, `beta += 1 - weight`.
    pub fn observe_weighted(&mut self, weight: f64) -> Result<(), MathError> {
        if weight.is_nan() || !(0.0..=1.0).contains(&weight) {
            return Err(MathError::InvalidProbability(weight));
        }
        self.alpha += weight;
        self.beta += 1.0 - weight;
        Ok(())
    }

    /// Record a batch of outcomes.
    pub fn observe_many(&mut self, successes: u64, failures: u64) {
        self.alpha += successes as f64;
        self.beta += failures as f64;
    }

    /// The prior this posterior was built from.
    pub fn prior(&self) -> BetaParams {
        self.prior
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Current shape parameters.
    pub fn params(&self) -> BetaParams {
        BetaParams {
            alpha: self.alpha,
            beta: self.beta,
        }
    }

    /// Evidence accumulated on top of the prior: `(alpha - alpha0, beta - beta0)`.
    pub fn evidence(&self) -> (f64, f64) {
        (self.alpha - self.prior.alpha, self.beta - self.prior.beta)
    }

    /// Total (possibly fractional) number of observations absorbed.
    pub fn observations(&self) -> f64 {
        let (s, f) = self.evidence();
        s + f
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn variance(&self) -> f64 {
        self.params().variance()
    }

    /// Mode with the 0/1 boundary conventions.
    ///
    /// Not a safe point estimate: for skewed posteriors (few observations,
    /// extreme observed rate) it may fall outside the credible interval.
    pub fn mode(&self) -> f64 {
        beta_mode(self.alpha, self.beta)
    }

    /// Median; always inside any equal-tailed credible interval.
    pub fn median(&self) -> f64 {
        beta_median(self.alpha, self.beta)
    }

    /// Inverse CDF at `p` in [0, 1].
    pub fn quantile(&self, p: f64) -> Result<f64, MathError> {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return Err(MathError::InvalidProbability(p));
        }
        Ok(beta_inv_cdf(p, self.alpha, self.beta))
    }

    /// P(rate <= x).
    pub fn cdf(&self, x: f64) -> f64 {
        beta_cdf(x, self.alpha, self.beta)
    }

    /// `(quantile((1-level)/2), quantile(1-(1-level)/2))`.
    pub fn credible_interval(&self, level: f64) -> Result<(f64, f64), MathError> {
        credible_interval(&self.params(), level)
    }

    /// A new posterior carrying `scale` of this posterior's evidence on top of
    /// the same prior:
    /// `alpha' = alpha0 + scale * (alpha - alpha0)`, `beta' = beta0 + scale * (beta - beta0)`.
    ///
    /// `scale = 0` is a cold start, `scale = 1` transfers everything.
    pub fn transfer(&self, scale: f64) -> Result<Self, MathError> {
        if scale.is_nan() || !(0.0..=1.0).contains(&scale) {
            return Err(MathError::InvalidScale(scale));
        }
        let (s, f) = self.evidence();
        Ok(Self {
            prior: self.prior,
            alpha: self.prior.alpha + scale * s,
            beta: self.prior.beta + scale * f,
        })
    }
}

impl Default for BetaPosterior {
    fn default() -> Self {
        Self::new(BetaParams::optimistic())
    }
}
