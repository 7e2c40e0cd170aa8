//! Confidence section: settings for confidence-based early termination.

use serde::{Deserialize, Serialize};

use crate::estimator::PriorSpec;

/// Confidence-engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Prior over the property's pass rate.
    pub prior: PriorSpec,

    /// Pass rate the property is required to exceed.
    pub pass_rate_threshold: f64,

    /// Stop early once P(rate > threshold) reaches this.
    pub target_confidence: f64,

    /// If set, keep sampling past `sample_size` until this confidence is reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,

    /// Observations required before confidence is trusted.
    pub min_observations: u64,

    /// Nominal sample budget.
    pub sample_size: u64,

    /// Hard ceiling on observations, including any `min_confidence` extension.
    pub max_iterations: u64,

    /// Observations between confidence checks.
    pub check_interval: u64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            prior: PriorSpec::Uniform,
            pass_rate_threshold: 0.999,
            target_confidence: 0.95,
            min_confidence: None,
            min_observations: 10,
            sample_size: 1000,
            max_iterations: 10_000,
            check_interval: 100,
        }
    }
}
