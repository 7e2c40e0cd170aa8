//! Filtered generators with a Bayesian size estimate.
//!
//! A filter keeps only base values that satisfy its predicate. Every
//! predicate evaluation, during warm-up or during `pick`, is a Bernoulli
//! observation of the pass rate and updates a Beta posterior. The filter's
//! size is the base size scaled by that posterior:
//!
//! - `ScaledBeta`: `base * median(rate)` with the credible interval of the
//!   rate scaled by the base bounds.
//! - `BetaBinomial`: for an exact base of at most
//!   [`fc_math::binomial::MAX_EXACT_TRIALS`] values, the posterior predictive
//!   count of passing values. Larger or estimated bases fall back to
//!   `ScaledBeta`.
//!
//! Shrinking builds a new filter over the shrunk base. Its posterior is
//! seeded by the [`ShrinkPolicy`](crate::shrink_policy::ShrinkPolicy) in the
//! settings and then warmed up against the new space.

use std::cell::Cell;
use std::rc::Rc;

use fc_config::IntervalModel;
use fc_math::binomial::{predictive_interval, predictive_quantile, MAX_EXACT_TRIALS};
use fc_math::{BetaPosterior, NORMAL_APPROX_CONCENTRATION};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace, warn};

use super::{derive_seed, Arbitrary, BoxedArbitrary, Draw, Pick};
use crate::settings::EstimatorSettings;
use crate::size::{self, SizeEstimate};

/// Rejections between checks for an effectively empty filter.
const EMPTY_CHECK_INTERVAL: u32 = 16;

pub struct FilteredArbitrary<T> {
    base: BoxedArbitrary<T>,
    predicate: Rc<dyn Fn(&T) -> bool>,
    posterior: BetaPosterior,
    settings: EstimatorSettings,
    rng: StdRng,
    seed: u64,
    depth: u32,
    warned_normal_fallback: Cell<bool>,
}

impl<T: Clone + 'static> FilteredArbitrary<T> {
    /// Build the filter and run its warm-up.
    pub fn new(
        base: BoxedArbitrary<T>,
        predicate: impl Fn(&T) -> bool + 'static,
        settings: &EstimatorSettings,
    ) -> Self {
        let seed = settings.resolve_seed();
        Self::from_parts(
            base,
            Rc::new(predicate),
            BetaPosterior::new(settings.prior()),
            *settings,
            seed,
            0,
        )
    }

    fn from_parts(
        base: BoxedArbitrary<T>,
        predicate: Rc<dyn Fn(&T) -> bool>,
        posterior: BetaPosterior,
        settings: EstimatorSettings,
        seed: u64,
        depth: u32,
    ) -> Self {
        let mut filter = Self {
            base,
            predicate,
            posterior,
            settings,
            rng: StdRng::seed_from_u64(seed),
            seed,
            depth,
            warned_normal_fallback: Cell::new(false),
        };
        filter.warm_up(settings.warm_up_samples());
        filter
    }

    /// Draw up to `samples` base values and observe the predicate on each.
    /// Stops early if the base is empty.
    pub fn warm_up(&mut self, samples: u32) {
        let mut observed = 0u32;
        for _ in 0..samples {
            match self.base.pick(&mut self.rng) {
                Draw::Picked(p) => {
                    self.posterior.observe((self.predicate)(&p.value));
                    observed += 1;
                }
                Draw::Rejected => {}
                Draw::Empty => break,
            }
        }
        debug!(
            depth = self.depth,
            observed,
            alpha = self.posterior.alpha(),
            beta = self.posterior.beta(),
            "filter warm-up complete"
        );
    }

    /// The current pass-rate posterior.
    pub fn posterior(&self) -> &BetaPosterior {
        &self.posterior
    }

    /// Shrink generations between this filter and the one the caller built.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn check_concentration(&self) {
        let concentration = self.posterior.alpha() + self.posterior.beta();
        if concentration > NORMAL_APPROX_CONCENTRATION && !self.warned_normal_fallback.get() {
            self.warned_normal_fallback.set(true);
            warn!(
                concentration,
                "posterior concentration past exact quantile range; using normal approximation"
            );
        }
    }

    fn beta_binomial_size(&self, n: u64) -> Option<SizeEstimate> {
        let params = self.posterior.params();
        let (lo, hi) = predictive_interval(&params, n, self.settings.credible_level()).ok()?;
        let median = predictive_quantile(&params, 0.5, n).ok()?;
        Some(SizeEstimate::estimated(
            median as f64,
            (lo as f64, hi as f64),
        ))
    }
}

impl<T: Clone + 'static> Clone for FilteredArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone_box(),
            predicate: Rc::clone(&self.predicate),
            posterior: self.posterior,
            settings: self.settings,
            rng: self.rng.clone(),
            seed: self.seed,
            depth: self.depth,
            warned_normal_fallback: Cell::new(self.warned_normal_fallback.get()),
        }
    }
}

impl<T: Clone + 'static> Arbitrary<T> for FilteredArbitrary<T> {
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<T> {
        let max_rejections = self.settings.max_rejections();
        let mut rejections = 0u32;
        loop {
            match self.base.pick(rng) {
                Draw::Empty => return Draw::Empty,
                Draw::Rejected => {}
                Draw::Picked(p) => {
                    let passed = (self.predicate)(&p.value);
                    self.posterior.observe(passed);
                    if passed {
                        return Draw::Picked(p);
                    }
                    trace!(rejections, "filter rejected value");
                }
            }
            rejections += 1;

            if rejections % EMPTY_CHECK_INTERVAL == 0 && self.size().upper() < 1.0 {
                debug!(rejections, "filter is effectively empty");
                return Draw::Empty;
            }
            if rejections >= max_rejections {
                warn!(
                    max_rejections,
                    alpha = self.posterior.alpha(),
                    beta = self.posterior.beta(),
                    "filter hit rejection limit"
                );
                return Draw::Rejected;
            }
        }
    }

    fn size(&self) -> SizeEstimate {
        let base = self.base.size();
        if base.is_empty() {
            return SizeEstimate::EMPTY;
        }
        self.check_concentration();

        if self.settings.interval_model() == IntervalModel::BetaBinomial {
            if let SizeEstimate::Exact { value } = base {
                if value <= MAX_EXACT_TRIALS {
                    if let Some(estimate) = self.beta_binomial_size(value) {
                        return estimate;
                    }
                }
            }
        }

        let rate = self.posterior.median();
        let interval = self
            .posterior
            .credible_interval(self.settings.credible_level())
            .unwrap_or((0.0, 1.0));
        size::scale(base, rate, interval)
    }

    fn shrink(&self, initial: &Pick<T>) -> BoxedArbitrary<T> {
        let policy = self.settings.shrink_policy();
        let posterior = policy.seed_posterior(&self.posterior);
        let depth = self.depth + 1;
        debug!(
            depth,
            scale = policy.scale(),
            alpha = posterior.alpha(),
            beta = posterior.beta(),
            "shrinking filter"
        );
        Box::new(Self::from_parts(
            self.base.shrink(initial),
            Rc::clone(&self.predicate),
            posterior,
            self.settings,
            derive_seed(self.seed, u64::from(depth)),
            depth,
        ))
    }

    fn can_generate(&self, pick: &Pick<T>) -> bool {
        self.base.can_generate(pick) && (self.predicate)(&pick.value)
    }

    fn corner_cases(&self) -> Vec<Pick<T>> {
        self.base
            .corner_cases()
            .into_iter()
            .filter(|p| (self.predicate)(&p.value))
            .collect()
    }

    fn clone_box(&self) -> BoxedArbitrary<T> {
        Box::new(self.clone())
    }
}
