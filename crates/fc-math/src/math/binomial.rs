//! Beta-Binomial predictive for counts.
//!
//! Given a Beta(α', β') posterior over a pass rate, the number of passing
//! candidates among `n` fresh candidates follows the Beta-Binomial
//! distribution:
//!
//! P(k | n, α', β') = C(n, k) · B(α' + k, β' + (n-k)) / B(α', β')
//!
//! This is the predictive used when the size of a filtered domain is reported
//! as a count rather than as a scaled rate.

use super::bernoulli::BetaParams;
use super::beta::beta_inv_cdf;
use super::error::MathError;
use super::stable::{log_beta, log_binomial};

/// Above this many trials the predictive quantile is approximated by the
/// scaled Beta quantile (the Beta-Binomial converges to `n · Beta`).
pub const MAX_EXACT_TRIALS: u64 = 100_000;

/// Compute the log probability mass function for the Beta-Binomial distribution.
///
/// # Arguments
/// * `posterior` - Posterior Beta parameters
/// * `k` - Number of successes in the new observation window
/// * `n` - Number of trials in the new observation window
pub fn log_predictive_pmf(posterior: &BetaParams, k: f64, n: f64) -> f64 {
    if k.is_nan() || n.is_nan() {
        return f64::NAN;
    }
    if k < 0.0 || n < 0.0 || k > n {
        return f64::NAN;
    }

    let log_binom = log_binomial(n, k);
    let alpha_new = posterior.alpha + k;
    let beta_new = posterior.beta + (n - k);

    log_binom + log_beta(alpha_new, beta_new) - log_beta(posterior.alpha, posterior.beta)
}

/// Compute the Beta-Binomial predictive mean for n future trials.
///
/// E[k | n, α', β'] = n · α' / (α' + β')
pub fn predictive_count_mean(posterior: &BetaParams, n: f64) -> f64 {
    n * posterior.mean()
}

/// Compute the Beta-Binomial predictive variance for n future trials.
///
/// Var[k | n, α', β'] = n · (α'β' / (α'+β')²) · ((α'+β'+n) / (α'+β'+1))
pub fn predictive_count_variance(posterior: &BetaParams, n: f64) -> f64 {
    let alpha = posterior.alpha;
    let beta = posterior.beta;
    let sum = alpha + beta;

    n * (alpha * beta / (sum * sum)) * ((sum + n) / (sum + 1.0))
}

/// P(K <= k) for K ~ BetaBinomial(n, α', β').
pub fn predictive_cdf(posterior: &BetaParams, k: u64, n: u64) -> f64 {
    if k >= n {
        return 1.0;
    }
    let mut total = 0.0;
    let mut log_p = log_predictive_pmf(posterior, 0.0, n as f64);
    for i in 0..=k {
        total += log_p.exp();
        log_p += pmf_log_ratio(posterior, i, n);
    }
    total.clamp(0.0, 1.0)
}

/// Smallest k with P(K <= k) >= p.
///
/// For `n > MAX_EXACT_TRIALS` the scaled Beta quantile `n · I⁻¹(p)` is
/// returned instead, rounded to the nearest count.
pub fn predictive_quantile(posterior: &BetaParams, p: f64, n: u64) -> Result<u64, MathError> {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(MathError::InvalidProbability(p));
    }
    if n == 0 {
        return Ok(0);
    }
    if n > MAX_EXACT_TRIALS {
        let x = beta_inv_cdf(p, posterior.alpha, posterior.beta);
        return Ok(((n as f64) * x).round() as u64);
    }

    let mut total = 0.0;
    let mut log_p = log_predictive_pmf(posterior, 0.0, n as f64);
    for k in 0..n {
        total += log_p.exp();
        if total >= p {
            return Ok(k);
        }
        log_p += pmf_log_ratio(posterior, k, n);
    }
    Ok(n)
}

/// Equal-tailed predictive interval for the count among `n` trials.
pub fn predictive_interval(
    posterior: &BetaParams,
    n: u64,
    level: f64,
) -> Result<(u64, u64), MathError> {
    if level.is_nan() || !(0.0..=1.0).contains(&level) {
        return Err(MathError::InvalidLevel(level));
    }
    let tail = (1.0 - level) / 2.0;
    let lower = predictive_quantile(posterior, tail, n)?;
    let upper = predictive_quantile(posterior, 1.0 - tail, n)?;
    Ok((lower, upper))
}

/// log P(k+1) - log P(k).
fn pmf_log_ratio(posterior: &BetaParams, k: u64, n: u64) -> f64 {
    let k = k as f64;
    let n = n as f64;
    (n - k).ln() - (k + 1.0).ln() + (posterior.alpha + k).ln()
        - (posterior.beta + n - k - 1.0).ln()
}
