//! Precondition errors for numeric inputs.

use thiserror::Error;

/// Caller contract violations on numeric inputs.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    #[error("credible level must lie in [0, 1], got {0}")]
    InvalidLevel(f64),

    #[error("probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("Beta parameters must be positive and finite, got alpha={alpha}, beta={beta}")]
    InvalidPrior { alpha: f64, beta: f64 },

    #[error("evidence scale must lie in [0, 1], got {0}")]
    InvalidScale(f64),
}
