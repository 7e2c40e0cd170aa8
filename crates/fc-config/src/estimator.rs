//! Size-estimator section: priors, warm-up and interval settings for filters,
//! maps and chains.

use serde::{Deserialize, Serialize};

/// Beta prior over a pass rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriorSpec {
    /// Beta(2, 1): leans towards predicates that mostly pass.
    #[default]
    #[serde(rename = "default", alias = "optimistic")]
    Optimistic,
    /// Beta(1, 1).
    Uniform,
    /// Beta(0.5, 0.5).
    Jeffreys,
    /// Explicit shape parameters.
    Custom { alpha: f64, beta: f64 },
}

impl PriorSpec {
    /// `(alpha0, beta0)` for this prior.
    pub fn params(&self) -> (f64, f64) {
        match *self {
            PriorSpec::Optimistic => (2.0, 1.0),
            PriorSpec::Uniform => (1.0, 1.0),
            PriorSpec::Jeffreys => (0.5, 0.5),
            PriorSpec::Custom { alpha, beta } => (alpha, beta),
        }
    }
}

/// How a filter's size interval is derived from its pass-rate posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntervalModel {
    /// Base size times the Beta credible interval of the pass rate.
    #[default]
    ScaledBeta,
    /// Beta-Binomial predictive count over an exact base (falls back to
    /// `ScaledBeta` for estimated or very large bases).
    BetaBinomial,
}

/// Estimator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Prior for every filter's pass-rate posterior.
    pub prior: PriorSpec,

    /// Samples drawn at filter construction before the first `size()`.
    pub warm_up_samples: u32,

    /// Two-sided credible level for estimated sizes.
    pub credible_level: f64,

    /// Fraction of a parent filter's evidence carried into a shrunk filter.
    /// 0 is a cold start.
    pub warm_start_scale: f64,

    /// Rejections a single filter `pick` tolerates before giving up.
    pub max_rejections: u32,

    pub interval_model: IntervalModel,

    /// Draws used to estimate the collision rate of a non-injective map.
    pub map_correction_samples: u32,

    /// Parent values sampled to bound a chain's size.
    pub chain_parent_samples: u32,

    /// Seed for warm-up and correction sampling; entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            prior: PriorSpec::Optimistic,
            warm_up_samples: 100,
            credible_level: 0.90,
            warm_start_scale: 0.0,
            max_rejections: 10_000,
            interval_model: IntervalModel::ScaledBeta,
            map_correction_samples: 200,
            chain_parent_samples: 32,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prior_params() {
        assert_eq!(PriorSpec::default().params(), (2.0, 1.0));
        assert_eq!(PriorSpec::Uniform.params(), (1.0, 1.0));
        assert_eq!(PriorSpec::Jeffreys.params(), (0.5, 0.5));
        assert_eq!(
            PriorSpec::Custom {
                alpha: 3.0,
                beta: 7.0
            }
            .params(),
            (3.0, 7.0)
        );
    }

    #[test]
    fn prior_serde_names() {
        assert_eq!(
            serde_json::to_string(&PriorSpec::Optimistic).unwrap(),
            "\"default\""
        );
        let parsed: PriorSpec = serde_json::from_str("\"optimistic\"").unwrap();
        assert_eq!(parsed, PriorSpec::Optimistic);
        let custom: PriorSpec =
            serde_json::from_str(r#"{"custom":{"alpha":0.25,"beta":4.0}}"#).unwrap();
        assert_eq!(custom.params(), (0.25, 4.0));
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EstimatorConfig::default();
        assert_eq!(cfg.warm_up_samples, 100);
        assert_eq!(cfg.credible_level, 0.90);
        assert_eq!(cfg.warm_start_scale, 0.0);
        assert_eq!(cfg.interval_model, IntervalModel::ScaledBeta);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn partial_section_fills_defaults() {
        let cfg: EstimatorConfig =
            serde_json::from_str(r#"{"warm_up_samples": 25, "interval_model": "beta_binomial"}"#)
                .unwrap();
        assert_eq!(cfg.warm_up_samples, 25);
        assert_eq!(cfg.interval_model, IntervalModel::BetaBinomial);
        assert_eq!(cfg.max_rejections, 10_000);
    }
}
