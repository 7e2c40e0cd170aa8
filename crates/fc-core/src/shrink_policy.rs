//! Warm-start / cold-start policy for shrunk filters.
//!
//! A shrunk filter is always a new instance with its own posterior. The
//! policy decides what that posterior starts from: the bare prior (cold), or
//! the prior plus a scaled share of the parent's evidence (warm):
//!
//! `alpha = alpha0 + scale * (parent.alpha - alpha0)`
//! `beta  = beta0  + scale * (parent.beta  - beta0)`
//!
//! Warm starts narrow intervals when the shrunk space passes at the parent's
//! rate, and bias them when it does not (e.g. shrinking into a subset where
//! the predicate always holds).

use fc_math::BetaPosterior;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How much parent evidence a shrunk filter inherits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShrinkPolicy {
    scale: f64,
}

impl ShrinkPolicy {
    /// Start every shrunk filter from the prior.
    pub const fn cold() -> Self {
        Self { scale: 0.0 }
    }

    /// Carry `scale` (in [0, 1]) of the parent's evidence.
    pub fn warm(scale: f64) -> Result<Self> {
        if scale.is_nan() || !(0.0..=1.0).contains(&scale) {
            return Err(Error::InvalidScale(scale));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_cold(&self) -> bool {
        self.scale == 0.0
    }

    /// Posterior a shrunk filter starts from, given its parent's.
    ///
    /// The parent is only read; the result shares no state with it.
    pub fn seed_posterior(&self, parent: &BetaPosterior) -> BetaPosterior {
        if self.is_cold() {
            return BetaPosterior::new(parent.prior());
        }
        // scale was validated on construction
        parent
            .transfer(self.scale)
            .unwrap_or_else(|_| BetaPosterior::new(parent.prior()))
    }
}

impl Default for ShrinkPolicy {
    fn default() -> Self {
        Self::cold()
    }
}
