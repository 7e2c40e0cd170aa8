//! Validated runtime settings.
//!
//! Settings are plain values handed to every constructor that needs them
//! (filters, collapsing maps, chains, stopping rules) and carried through
//! `shrink`. Nothing reads configuration from process-wide state.

use fc_config::{ConfidenceConfig, EstimatorConfig, IntervalModel, PriorSpec};
use fc_math::bernoulli::BetaParams;

use crate::error::{Error, Result};
use crate::shrink_policy::ShrinkPolicy;

fn prior_params(spec: &PriorSpec) -> Result<BetaParams> {
    let (alpha, beta) = spec.params();
    Ok(BetaParams::try_new(alpha, beta)?)
}

fn check_unit(value: f64, err: fn(f64) -> Error) -> Result<f64> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(err(value));
    }
    Ok(value)
}

/// Settings for size estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorSettings {
    prior: BetaParams,
    warm_up_samples: u32,
    credible_level: f64,
    shrink_policy: ShrinkPolicy,
    max_rejections: u32,
    interval_model: IntervalModel,
    map_correction_samples: u32,
    chain_parent_samples: u32,
    seed: Option<u64>,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            prior: BetaParams::optimistic(),
            warm_up_samples: 100,
            credible_level: 0.90,
            shrink_policy: ShrinkPolicy::cold(),
            max_rejections: 10_000,
            interval_model: IntervalModel::ScaledBeta,
            map_correction_samples: 200,
            chain_parent_samples: 32,
            seed: None,
        }
    }
}

impl EstimatorSettings {
    pub fn prior(&self) -> BetaParams {
        self.prior
    }

    pub fn warm_up_samples(&self) -> u32 {
        self.warm_up_samples
    }

    pub fn credible_level(&self) -> f64 {
        self.credible_level
    }

    pub fn shrink_policy(&self) -> ShrinkPolicy {
        self.shrink_policy
    }

    pub fn max_rejections(&self) -> u32 {
        self.max_rejections
    }

    pub fn interval_model(&self) -> IntervalModel {
        self.interval_model
    }

    pub fn map_correction_samples(&self) -> u32 {
        self.map_correction_samples
    }

    pub fn chain_parent_samples(&self) -> u32 {
        self.chain_parent_samples
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The configured seed, or a fresh one drawn from the thread RNG.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn with_prior(mut self, prior: BetaParams) -> Self {
        self.prior = prior;
        self
    }

    pub fn with_warm_up_samples(mut self, samples: u32) -> Self {
        self.warm_up_samples = samples;
        self
    }

    pub fn with_credible_level(mut self, level: f64) -> Result<Self> {
        self.credible_level = check_unit(level, Error::InvalidLevel)?;
        Ok(self)
    }

    pub fn with_shrink_policy(mut self, policy: ShrinkPolicy) -> Self {
        self.shrink_policy = policy;
        self
    }

    /// Shorthand for `with_shrink_policy(ShrinkPolicy::warm(scale)?)`.
    pub fn with_warm_start_scale(self, scale: f64) -> Result<Self> {
        Ok(self.with_shrink_policy(ShrinkPolicy::warm(scale)?))
    }

    pub fn with_max_rejections(mut self, max: u32) -> Self {
        self.max_rejections = max.max(1);
        self
    }

    pub fn with_interval_model(mut self, model: IntervalModel) -> Self {
        self.interval_model = model;
        self
    }

    pub fn with_map_correction_samples(mut self, samples: u32) -> Self {
        self.map_correction_samples = samples.max(1);
        self
    }

    pub fn with_chain_parent_samples(mut self, samples: u32) -> Self {
        self.chain_parent_samples = samples.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl TryFrom<&EstimatorConfig> for EstimatorSettings {
    type Error = Error;

    fn try_from(config: &EstimatorConfig) -> Result<Self> {
        fc_config::validate::validate_estimator(config)?;
        Ok(Self {
            prior: prior_params(&config.prior)?,
            warm_up_samples: config.warm_up_samples,
            credible_level: config.credible_level,
            shrink_policy: ShrinkPolicy::warm(config.warm_start_scale)?,
            max_rejections: config.max_rejections,
            interval_model: config.interval_model,
            map_correction_samples: config.map_correction_samples,
            chain_parent_samples: config.chain_parent_samples,
            seed: config.seed,
        })
    }
}

/// Settings for the confidence engine and stopping rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceSettings {
    prior: BetaParams,
    pass_rate_threshold: f64,
    target_confidence: f64,
    min_confidence: Option<f64>,
    min_observations: u64,
    sample_size: u64,
    max_iterations: u64,
    check_interval: u64,
}

impl Default for ConfidenceSettings {
    fn default() -> Self {
        Self {
            prior: BetaParams::uniform(),
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

impl ConfidenceSettings {
    pub fn prior(&self) -> BetaParams {
        self.prior
    }

    pub fn pass_rate_threshold(&self) -> f64 {
        self.pass_rate_threshold
    }

    pub fn target_confidence(&self) -> f64 {
        self.target_confidence
    }

    pub fn min_confidence(&self) -> Option<f64> {
        self.min_confidence
    }

    pub fn min_observations(&self) -> u64 {
        self.min_observations
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    pub fn check_interval(&self) -> u64 {
        self.check_interval
    }

    pub fn with_prior(mut self, prior: BetaParams) -> Self {
        self.prior = prior;
        self
    }

    pub fn with_pass_rate_threshold(mut self, threshold: f64) -> Result<Self> {
        self.pass_rate_threshold = check_unit(threshold, Error::InvalidThreshold)?;
        Ok(self)
    }

    pub fn with_target_confidence(mut self, target: f64) -> Result<Self> {
        self.target_confidence = check_unit(target, Error::InvalidLevel)?;
        Ok(self)
    }

    pub fn with_min_confidence(mut self, min: f64) -> Result<Self> {
        self.min_confidence = Some(check_unit(min, Error::InvalidLevel)?);
        Ok(self)
    }

    pub fn with_min_observations(mut self, n: u64) -> Self {
        self.min_observations = n;
        self
    }

    /// Nominal budget and hard ceiling; the ceiling is raised to the budget
    /// if it is lower.
    pub fn with_budget(mut self, sample_size: u64, max_iterations: u64) -> Self {
        self.sample_size = sample_size;
        self.max_iterations = max_iterations.max(sample_size);
        self
    }

    pub fn with_check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval.max(1);
        self
    }
}

impl TryFrom<&ConfidenceConfig> for ConfidenceSettings {
    type Error = Error;

    fn try_from(config: &ConfidenceConfig) -> Result<Self> {
        fc_config::validate::validate_confidence(config)?;
        Ok(Self {
            prior: prior_params(&config.prior)?,
            pass_rate_threshold: config.pass_rate_threshold,
            target_confidence: config.target_confidence,
            min_confidence: config.min_confidence,
            min_observations: config.min_observations,
            sample_size: config.sample_size,
            max_iterations: config.max_iterations,
            check_interval: config.check_interval,
        })
    }
}

/// Both settings blocks, as produced from a complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Settings {
    pub estimator: EstimatorSettings,
    pub confidence: ConfidenceSettings,
}

impl TryFrom<&fc_config::Config> for Settings {
    type Error = Error;

    fn try_from(config: &fc_config::Config) -> Result<Self> {
        fc_config::validate_config(config)?;
        Ok(Self {
            estimator: EstimatorSettings::try_from(&config.estimator)?,
            confidence: ConfidenceSettings::try_from(&config.confidence)?,
        })
    }
}
