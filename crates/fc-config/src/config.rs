//! Top-level configuration document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceConfig;
use crate::estimator::EstimatorConfig;
use crate::validate::{ValidationError, ValidationResult};

/// Complete configuration: one section per engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub estimator: EstimatorConfig,
    pub confidence: ConfidenceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            estimator: EstimatorConfig::default(),
            confidence: ConfidenceConfig::default(),
        }
    }
}

impl Config {
    /// Load from a file: `.toml` is parsed as TOML, anything else as JSON.
    ///
    /// The result is parsed but not validated.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if is_toml(path) {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> ValidationResult<Self> {
        toml::from_str(content).map_err(|e| ValidationError::Parse(format!("Invalid TOML: {}", e)))
    }

    /// Parse from a JSON string.
    pub fn from_json_str(content: &str) -> ValidationResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| ValidationError::Parse(format!("Invalid JSON: {}", e)))
    }

    /// Render as TOML, e.g. to seed a user config file.
    pub fn to_toml_string(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ValidationError::Parse(format!("Cannot render TOML: {}", e)))
    }

    /// Canonical JSON form used for hashing.
    pub fn to_canonical_json(&self) -> ValidationResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ValidationError::Parse(format!("Cannot render JSON: {}", e)))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}
