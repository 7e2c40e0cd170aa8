//! Beta distribution utilities for Bayesian updates.
//!
//! Provides PDF, CDF, and inverse CDF, plus mean/variance/mode/median helpers.
//! The CDF uses the regularized incomplete beta function with
//! a modified-Lentz continued fraction (Numerical Recipes). The inverse CDF
//! brackets the root and bisects on a relative tolerance, so it stays finite
//! for the near-degenerate posteriors produced by long runs of identical
//! observations.

use super::stable::{log_beta, normal_quantile};

// Convergence needs O(sqrt(max(alpha, beta))) terms for large shapes.
const BETACF_MAX_ITERS: usize = 20_000;
const BETACF_EPS: f64 = 1.0e-15;
const BETACF_FPMIN: f64 = 1.0e-300;

const INV_CDF_MAX_ITERS: usize = 1_200;
const INV_CDF_REL_TOL: f64 = 1.0e-13;

/// Above this concentration (alpha + beta) the quantile switches to a
/// moment-matched normal approximation.
pub const NORMAL_APPROX_CONCENTRATION: f64 = 1.0e7;

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Mode of Beta(alpha, beta).
///
/// Boundary conventions: 0 when alpha <= 1, otherwise 1 when beta <= 1.
/// For skewed shapes the mode can sit outside the equal-tailed credible
/// interval; use [`beta_median`] as a point estimate.
pub fn beta_mode(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if alpha <= 1.0 {
        return 0.0;
    }
    if beta <= 1.0 {
        return 1.0;
    }
    (alpha - 1.0) / (alpha + beta - 2.0)
}

/// Median of Beta(alpha, beta).
///
/// Closed forms for the symmetric and unit-shape cases, inverse CDF otherwise.
pub fn beta_median(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if alpha == beta {
        return 0.5;
    }
    if alpha == 1.0 {
        return 1.0 - 0.5f64.powf(1.0 / beta);
    }
    if beta == 1.0 {
        return 0.5f64.powf(1.0 / alpha);
    }
    beta_inv_cdf(0.5, alpha, beta)
}

/// Log of the Beta PDF at x.
pub fn log_beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        if alpha < 1.0 {
            return f64::INFINITY;
        }
        if alpha > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(1.0, beta);
    }
    if x == 1.0 {
        if beta < 1.0 {
            return f64::INFINITY;
        }
        if beta > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(alpha, 1.0);
    }
    let log_x = x.ln();
    let log_one_minus = (-x).ln_1p();
    (alpha - 1.0) * log_x + (beta - 1.0) * log_one_minus - log_beta(alpha, beta)
}

/// Beta PDF at x.
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    let log_pdf = log_beta_pdf(x, alpha, beta);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    if log_pdf == f64::INFINITY {
        return f64::INFINITY;
    }
    if log_pdf == f64::NEG_INFINITY {
        return 0.0;
    }
    log_pdf.exp()
}

/// Regularized incomplete beta function I_x(a,b).
///
/// The result is clamped to [0, 1].
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_bt = alpha * x.ln() + beta * (-x).ln_1p() - log_beta(alpha, beta);
    let bt = ln_bt.exp();
    let threshold = (alpha + 1.0) / (alpha + beta + 2.0);
    let value = if x < threshold {
        bt * betacf(alpha, beta, x) / alpha
    } else {
        1.0 - bt * betacf(beta, alpha, 1.0 - x) / beta
    };
    if value.is_nan() {
        return f64::NAN;
    }
    value.clamp(0.0, 1.0)
}

/// Inverse CDF (quantile) for Beta(alpha, beta).
///
/// Returns a value in [0, 1] for every valid input; NaN only when an input is
/// NaN or a shape parameter is non-positive.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    if alpha + beta > NORMAL_APPROX_CONCENTRATION {
        return normal_approx_quantile(p, alpha, beta);
    }

    let mut low = 0.0_f64;
    let mut high = 1.0_f64;
    let mut mid = 0.5;
    for _ in 0..INV_CDF_MAX_ITERS {
        mid = 0.5 * (low + high);
        if mid <= low || mid >= high {
            break;
        }
        let cdf = beta_cdf(mid, alpha, beta);
        if cdf.is_nan() {
            break;
        }
        if cdf < p {
            low = mid;
        } else {
            high = mid;
        }
        if high - low <= INV_CDF_REL_TOL * mid.min(1.0 - mid).max(f64::MIN_POSITIVE) {
            break;
        }
    }
    mid.clamp(0.0, 1.0)
}

/// Normal approximation to the Beta quantile for very concentrated shapes.
pub fn normal_approx_quantile(p: f64, alpha: f64, beta: f64) -> f64 {
    let mean = alpha / (alpha + beta);
    let sd = beta_var(alpha, beta).sqrt();
    let z = normal_quantile(p);
    if !z.is_finite() {
        return if z > 0.0 { 1.0 } else { 0.0 };
    }
    (mean + z * sd).clamp(0.0, 1.0)
}

fn betacf(alpha: f64, beta: f64, x: f64) -> f64 {
    let qab = alpha + beta;
    let qap = alpha + 1.0;
    let qam = alpha - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;
        let aa = m_f * (beta - m_f) * x / ((qam + m2) * (alpha + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(alpha + m_f) * (qab + m_f) * x / ((alpha + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}
