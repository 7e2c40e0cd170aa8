//! Bayesian confidence that a property holds, and the stopping rule built
//! on it.
//!
//! Test outcomes are Bernoulli observations of the property's pass rate.
//! Confidence is the posterior probability that the rate exceeds a
//! threshold: `1 - BetaCDF(threshold; alpha0 + s, beta0 + f)`.

use fc_math::bernoulli::BetaParams;
use fc_math::BetaPosterior;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::ConfidenceSettings;

/// P(pass rate > `threshold`) under a uniform prior after `successes`
/// passes and `failures` failures.
///
/// Callers should wait for a minimum number of observations before acting
/// on the result.
pub fn calculate_bayesian_confidence(successes: u64, failures: u64, threshold: f64) -> Result<f64> {
    ConfidenceEngine::default().confidence(successes, failures, threshold)
}

/// Confidence queries under a configurable prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceEngine {
    prior: BetaParams,
}

impl Default for ConfidenceEngine {
    fn default() -> Self {
        Self {
            prior: BetaParams::uniform(),
        }
    }
}

impl ConfidenceEngine {
    pub fn with_prior(prior: BetaParams) -> Self {
        Self { prior }
    }

    pub fn prior(&self) -> BetaParams {
        self.prior
    }

    pub fn posterior(&self, successes: u64, failures: u64) -> BetaPosterior {
        let mut posterior = BetaPosterior::new(self.prior);
        posterior.observe_many(successes, failures);
        posterior
    }

    pub fn confidence(&self, successes: u64, failures: u64, threshold: f64) -> Result<f64> {
        if threshold.is_nan() || !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidThreshold(threshold));
        }
        let cdf = self.posterior(successes, failures).cdf(threshold);
        Ok((1.0 - cdf).clamp(0.0, 1.0))
    }

    /// Equal-tailed credible interval for the pass rate.
    pub fn credible_interval(&self, successes: u64, failures: u64, level: f64) -> Result<(f64, f64)> {
        if level.is_nan() || !(0.0..=1.0).contains(&level) {
            return Err(Error::InvalidLevel(level));
        }
        Ok(self.posterior(successes, failures).credible_interval(level)?)
    }
}

/// Outcome of one property evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    /// The input did not meet the property's precondition; not an
    /// observation.
    PreconditionFailed,
}

/// Running counts of verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceTracker {
    passes: u64,
    failures: u64,
    skipped: u64,
}

impl ConfidenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passes += 1,
            Verdict::Fail => self.failures += 1,
            Verdict::PreconditionFailed => self.skipped += 1,
        }
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Passes plus failures.
    pub fn observations(&self) -> u64 {
        self.passes + self.failures
    }

    /// Every evaluation, skips included.
    pub fn attempts(&self) -> u64 {
        self.observations() + self.skipped
    }
}

/// Why sampling stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Confidence reached the target.
    Confident,
    /// The nominal budget was spent and any minimum confidence was met.
    BudgetExhausted,
    /// The hard iteration ceiling was hit.
    CeilingReached,
    /// A counterexample was found.
    Falsified,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StopReason::Confident => "confident",
            StopReason::BudgetExhausted => "budget_exhausted",
            StopReason::CeilingReached => "ceiling_reached",
            StopReason::Falsified => "falsified",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop(StopReason),
}

/// Result of [`StoppingRule::run`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub reason: StopReason,
    pub tracker: ConfidenceTracker,
    pub confidence: f64,
}

/// Early-termination contract for a sampling loop.
///
/// Observations are passes and failures; precondition skips only count
/// against the hard ceiling, which bounds every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoppingRule {
    settings: ConfidenceSettings,
    engine: ConfidenceEngine,
}

impl StoppingRule {
    pub fn new(settings: ConfidenceSettings) -> Self {
        Self {
            settings,
            engine: ConfidenceEngine::with_prior(settings.prior()),
        }
    }

    pub fn settings(&self) -> &ConfidenceSettings {
        &self.settings
    }

    pub fn confidence(&self, tracker: &ConfidenceTracker) -> f64 {
        // threshold validated when the settings were built
        self.engine
            .confidence(
                tracker.passes(),
                tracker.failures(),
                self.settings.pass_rate_threshold(),
            )
            .unwrap_or(0.0)
    }

    fn is_checkpoint(&self, n: u64) -> bool {
        n % self.settings.check_interval() == 0 || n == self.settings.sample_size()
    }

    pub fn decide(&self, tracker: &ConfidenceTracker) -> Decision {
        let s = &self.settings;
        let n = tracker.observations();

        if tracker.failures() > 0 {
            return Decision::Stop(StopReason::Falsified);
        }
        if tracker.attempts() >= s.max_iterations() {
            return Decision::Stop(StopReason::CeilingReached);
        }
        if n < s.min_observations() {
            return Decision::Continue;
        }

        let checkpoint = self.is_checkpoint(n);
        let past_budget = n >= s.sample_size();
        if !checkpoint && !past_budget {
            return Decision::Continue;
        }

        let confidence = self.confidence(tracker);
        if checkpoint && confidence >= s.target_confidence() {
            return Decision::Stop(StopReason::Confident);
        }
        if past_budget && s.min_confidence().map_or(true, |min| confidence >= min) {
            return Decision::Stop(StopReason::BudgetExhausted);
        }
        Decision::Continue
    }

    /// Evaluate `next` until the rule says stop.
    pub fn run(&self, mut next: impl FnMut() -> Verdict) -> RunSummary {
        let mut tracker = ConfidenceTracker::new();
        let reason = loop {
            tracker.record(next());
            if let Decision::Stop(reason) = self.decide(&tracker) {
                break reason;
            }
        };
        let confidence = self.confidence(&tracker);
        debug!(
            %reason,
            passes = tracker.passes(),
            failures = tracker.failures(),
            skipped = tracker.skipped(),
            confidence,
            "sampling stopped"
        );
        RunSummary {
            reason,
            tracker,
            confidence,
        }
    }
}
