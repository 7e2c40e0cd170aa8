//! Configuration snapshots for reproducibility.
//!
//! A snapshot captures the exact configuration behind an estimation run so
//! its sizes and confidences can be audited and reproduced later.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::load::LoadedConfig;
use crate::resolve::ConfigSource;
use crate::validate::ValidationResult;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Where the configuration came from.
    pub source: ConfigSource,

    /// Path it was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// SHA-256 of the canonical JSON form of the configuration.
    pub config_hash: String,

    /// Sampling seed, when fixed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub estimator_prior: (f64, f64),
    pub warm_up_samples: u32,
    pub credible_level: f64,
    pub warm_start_scale: f64,
    pub confidence_prior: (f64, f64),
    pub pass_rate_threshold: f64,
    pub target_confidence: f64,
}

impl ConfigSnapshot {
    /// Snapshot a configuration.
    pub fn new(
        config: &Config,
        source: ConfigSource,
        path: Option<&Path>,
    ) -> ValidationResult<Self> {
        let canonical = config.to_canonical_json()?;
        Ok(ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            source,
            path: path.map(|p| p.display().to_string()),
            config_hash: hash_content(&canonical),
            seed: config.estimator.seed,
            summary: ConfigSummary::from_config(config),
        })
    }

    /// Snapshot a loaded configuration.
    pub fn from_loaded(loaded: &LoadedConfig) -> ValidationResult<Self> {
        Self::new(&loaded.config, loaded.source, loaded.path.as_deref())
    }

    /// Snapshot of the built-in defaults.
    pub fn defaults_only() -> ValidationResult<Self> {
        Self::new(&Config::default(), ConfigSource::BuiltinDefault, None)
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }
}

impl ConfigSummary {
    fn from_config(config: &Config) -> Self {
        ConfigSummary {
            estimator_prior: config.estimator.prior.params(),
            warm_up_samples: config.estimator.warm_up_samples,
            credible_level: config.estimator.credible_level,
            warm_start_scale: config.estimator.warm_start_scale,
            confidence_prior: config.confidence.prior.params(),
            pass_rate_threshold: config.confidence.pass_rate_threshold,
            target_confidence: config.confidence.target_confidence,
        }
    }
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_snapshot() {
        let snapshot = ConfigSnapshot::defaults_only().unwrap();
        assert_eq!(snapshot.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert_eq!(snapshot.source, ConfigSource::BuiltinDefault);
        assert!(snapshot.seed.is_none());
        assert_eq!(snapshot.summary.estimator_prior, (2.0, 1.0));
        assert_eq!(snapshot.summary.confidence_prior, (1.0, 1.0));
    }

    #[test]
    fn test_snapshot_short_id() {
        let snapshot = ConfigSnapshot::defaults_only().unwrap();
        assert_eq!(snapshot.short_id().len(), 12);
    }

    #[test]
    fn hash_ignores_source_but_not_values() {
        let a = ConfigSnapshot::new(&Config::default(), ConfigSource::Programmatic, None).unwrap();
        let b = ConfigSnapshot::defaults_only().unwrap();
        assert!(a.matches(&b));

        let mut changed = Config::default();
        changed.estimator.warm_start_scale = 0.25;
        let c = ConfigSnapshot::new(&changed, ConfigSource::Programmatic, None).unwrap();
        assert!(!a.matches(&c));
    }

    #[test]
    fn seed_is_recorded() {
        let mut cfg = Config::default();
        cfg.estimator.seed = Some(99);
        let snapshot = ConfigSnapshot::new(&cfg, ConfigSource::Programmatic, None).unwrap();
        assert_eq!(snapshot.seed, Some(99));
    }

    #[test]
    fn test_hash_content() {
        let hash1 = hash_content("test");
        let hash2 = hash_content("test");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snapshot = ConfigSnapshot::defaults_only().unwrap();
        let json = snapshot.to_json().unwrap();
        let restored = ConfigSnapshot::from_json(&json).unwrap();
        assert!(snapshot.matches(&restored));
    }
}
