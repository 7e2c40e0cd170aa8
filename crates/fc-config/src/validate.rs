//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::confidence::ConfidenceConfig;
use crate::config::Config;
use crate::estimator::{EstimatorConfig, PriorSpec};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Semantic validation failed: {0}")]
    Semantic(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::Io(_) => 60,
            ValidationError::Parse(_) => 61,
            ValidationError::Semantic(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    /// Field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Validate a complete configuration semantically.
pub fn validate_config(config: &Config) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_estimator(&config.estimator)?;
    validate_confidence(&config.confidence)?;

    Ok(())
}

/// Validate the estimator section.
pub fn validate_estimator(estimator: &EstimatorConfig) -> ValidationResult<()> {
    validate_prior("estimator.prior", &estimator.prior)?;
    validate_unit("estimator.credible_level", estimator.credible_level)?;
    validate_unit("estimator.warm_start_scale", estimator.warm_start_scale)?;

    if estimator.max_rejections == 0 {
        return Err(ValidationError::InvalidValue {
            field: "estimator.max_rejections".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    if estimator.map_correction_samples == 0 {
        return Err(ValidationError::InvalidValue {
            field: "estimator.map_correction_samples".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    if estimator.chain_parent_samples == 0 {
        return Err(ValidationError::InvalidValue {
            field: "estimator.chain_parent_samples".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate the confidence section.
pub fn validate_confidence(confidence: &ConfidenceConfig) -> ValidationResult<()> {
    validate_prior("confidence.prior", &confidence.prior)?;
    validate_unit(
        "confidence.pass_rate_threshold",
        confidence.pass_rate_threshold,
    )?;
    validate_unit("confidence.target_confidence", confidence.target_confidence)?;

    if let Some(min) = confidence.min_confidence {
        validate_unit("confidence.min_confidence", min)?;
        if min > confidence.target_confidence {
            return Err(ValidationError::Semantic(format!(
                "confidence.min_confidence ({}) must not exceed confidence.target_confidence ({})",
                min, confidence.target_confidence
            )));
        }
    }

    if confidence.check_interval == 0 {
        return Err(ValidationError::InvalidValue {
            field: "confidence.check_interval".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if confidence.max_iterations < confidence.sample_size {
        return Err(ValidationError::Semantic(format!(
            "confidence.max_iterations ({}) must be >= confidence.sample_size ({})",
            confidence.max_iterations, confidence.sample_size
        )));
    }

    Ok(())
}

/// Validate Beta prior parameters.
fn validate_prior(field: &str, prior: &PriorSpec) -> ValidationResult<()> {
    let (alpha, beta) = prior.params();

    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.alpha", field),
            message: format!("Must be positive and finite, got {}", alpha),
        });
    }

    if !(beta.is_finite() && beta > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.beta", field),
            message: format!("Must be positive and finite, got {}", beta),
        });
    }

    Ok(())
}

fn validate_unit(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [0, 1], got {}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn prior_validation() {
        let valid = PriorSpec::Custom {
            alpha: 2.0,
            beta: 5.0,
        };
        assert!(validate_prior("test", &valid).is_ok());

        let invalid = PriorSpec::Custom {
            alpha: -1.0,
            beta: 5.0,
        };
        let err = validate_prior("test", &invalid).unwrap_err();
        assert_eq!(err.field(), Some("test.alpha"));

        let nan = PriorSpec::Custom {
            alpha: 1.0,
            beta: f64::NAN,
        };
        assert!(validate_prior("test", &nan).is_err());
    }

    #[test]
    fn schema_version_must_match() {
        let mut cfg = Config::default();
        cfg.schema_version = "0.9.0".to_string();
        let err = validate_config(&cfg).unwrap_err();
        assert_eq!(err.code(), 66);
    }

    #[test]
    fn credible_level_outside_unit_interval() {
        let mut cfg = Config::default();
        cfg.estimator.credible_level = 1.5;
        let err = validate_config(&cfg).unwrap_err();
        assert_eq!(err.field(), Some("estimator.credible_level"));
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn warm_start_scale_outside_unit_interval() {
        let mut cfg = Config::default();
        cfg.estimator.warm_start_scale = -0.1;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn budget_ceiling_below_nominal() {
        let mut cfg = Config::default();
        cfg.confidence.max_iterations = 10;
        let err = validate_config(&cfg).unwrap_err();
        assert!(matches!(err, ValidationError::Semantic(_)));
    }

    #[test]
    fn min_confidence_above_target() {
        let mut cfg = Config::default();
        cfg.confidence.min_confidence = Some(0.99);
        cfg.confidence.target_confidence = 0.9;
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::Semantic(_))
        ));
    }

    #[test]
    fn zero_counts_rejected() {
        let mut cfg = Config::default();
        cfg.confidence.check_interval = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.estimator.max_rejections = 0;
        assert!(validate_config(&cfg).is_err());
    }
}
