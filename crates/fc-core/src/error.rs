//! Error types for fluent-check estimation.
//!
//! Every error is a caller contract violation detected at input validation;
//! composition and sampling never fail at run time.
//!
//! Codes are stable and grouped by category:
//! - 10-19: Estimation (levels, scales, numeric preconditions)
//! - 20-29: Confidence (thresholds)
//! - 30-39: Generator construction
//! - 60-69: Configuration (delegated to `fc_config::ValidationError`)

use fc_config::ValidationError;
use fc_math::MathError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fluent-check operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file and settings errors.
    Config,
    /// Size estimation and posterior numerics.
    Estimation,
    /// Confidence queries and stopping rules.
    Confidence,
    /// Generator construction.
    Generator,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Estimation => write!(f, "estimation"),
            ErrorCategory::Confidence => write!(f, "confidence"),
            ErrorCategory::Generator => write!(f, "generator"),
        }
    }
}

/// Unified error type for fluent-check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Estimation errors (10-19)
    #[error("numeric precondition violated: {0}")]
    Math(#[from] MathError),

    #[error("credible level must lie in [0, 1], got {0}")]
    InvalidLevel(f64),

    #[error("warm-start scale must lie in [0, 1], got {0}")]
    InvalidScale(f64),

    // Confidence errors (20-29)
    #[error("pass-rate threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f64),

    // Generator errors (30-39)
    #[error("invalid length range: min {min} > max {max}")]
    InvalidRange { min: usize, max: usize },

    // Configuration errors (60-69)
    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),
}

impl Error {
    /// Returns the error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::Math(_) => 10,
            Error::InvalidLevel(_) => 11,
            Error::InvalidScale(_) => 12,
            Error::InvalidThreshold(_) => 20,
            Error::InvalidRange { .. } => 30,
            Error::Config(inner) => inner.code(),
        }
    }

    /// Returns the category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Math(_) | Error::InvalidLevel(_) | Error::InvalidScale(_) => {
                ErrorCategory::Estimation
            }
            Error::InvalidThreshold(_) => ErrorCategory::Confidence,
            Error::InvalidRange { .. } => ErrorCategory::Generator,
            Error::Config(_) => ErrorCategory::Config,
        }
    }
}
