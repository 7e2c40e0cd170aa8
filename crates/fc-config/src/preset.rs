//! Configuration presets for common testing scenarios.
//!
//! - Quick: small warm-ups and budgets for tight edit-test loops
//! - Balanced: the built-in defaults
//! - Thorough: large warm-ups, wider intervals, extended budgets
//! - Deterministic: defaults with a fixed seed for reproducible estimates

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;

/// Seed used by the deterministic preset.
pub const DETERMINISTIC_SEED: u64 = 0x5EED_F10E_C4EC;

/// Available configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Quick,
    Balanced,
    Thorough,
    Deterministic,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::Quick,
        PresetName::Balanced,
        PresetName::Thorough,
        PresetName::Deterministic,
    ];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Quick => "quick",
            PresetName::Balanced => "balanced",
            PresetName::Thorough => "thorough",
            PresetName::Deterministic => "deterministic",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "quick" | "fast" => Some(PresetName::Quick),
            "balanced" | "default" => Some(PresetName::Balanced),
            "thorough" | "slow" => Some(PresetName::Thorough),
            "deterministic" | "seeded" | "ci" => Some(PresetName::Deterministic),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Quick => "Small warm-ups and sample budgets for fast feedback",
            PresetName::Balanced => "Built-in defaults",
            PresetName::Thorough => {
                "Large warm-ups, 95% intervals and extended budgets with a confidence floor"
            }
            PresetName::Deterministic => "Built-in defaults with a fixed sampling seed",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PresetError {
    #[error("Unknown preset '{0}'. Available: {available}", available = available_names())]
    UnknownPreset(String),
}

fn available_names() -> String {
    PresetName::ALL
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Get the configuration for a preset.
pub fn get_preset(name: PresetName) -> Config {
    match name {
        PresetName::Quick => quick_preset(),
        PresetName::Balanced => Config::default(),
        PresetName::Thorough => thorough_preset(),
        PresetName::Deterministic => deterministic_preset(),
    }
}

fn quick_preset() -> Config {
    let mut config = Config::default();
    config.estimator.warm_up_samples = 30;
    config.estimator.max_rejections = 1_000;
    config.estimator.map_correction_samples = 64;
    config.estimator.chain_parent_samples = 16;
    config.confidence.target_confidence = 0.90;
    config.confidence.sample_size = 100;
    config.confidence.max_iterations = 1_000;
    config.confidence.check_interval = 25;
    config
}

fn thorough_preset() -> Config {
    let mut config = Config::default();
    config.estimator.warm_up_samples = 500;
    config.estimator.credible_level = 0.95;
    config.estimator.max_rejections = 100_000;
    config.estimator.map_correction_samples = 1_000;
    config.estimator.chain_parent_samples = 128;
    config.confidence.target_confidence = 0.99;
    config.confidence.min_confidence = Some(0.95);
    config.confidence.sample_size = 5_000;
    config.confidence.max_iterations = 50_000;
    config.confidence.check_interval = 250;
    config
}

fn deterministic_preset() -> Config {
    let mut config = Config::default();
    config.estimator.seed = Some(DETERMINISTIC_SEED);
    config
}

/// Information about a preset for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub description: String,
    pub warm_up_samples: u32,
    pub credible_level: f64,
    pub sample_size: u64,
    pub max_iterations: u64,
    pub seeded: bool,
}

impl PresetInfo {
    /// Create info from a preset.
    pub fn from_preset(name: PresetName) -> Self {
        let config = get_preset(name);
        Self {
            name: name.as_str().to_string(),
            description: name.description().to_string(),
            warm_up_samples: config.estimator.warm_up_samples,
            credible_level: config.estimator.credible_level,
            sample_size: config.confidence.sample_size,
            max_iterations: config.confidence.max_iterations,
            seeded: config.estimator.seed.is_some(),
        }
    }
}

/// List all available presets with summary information.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| PresetInfo::from_preset(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_config;

    #[test]
    fn test_preset_name_parsing() {
        assert_eq!(PresetName::parse("quick"), Some(PresetName::Quick));
        assert_eq!(PresetName::parse("FAST"), Some(PresetName::Quick));
        assert_eq!(PresetName::parse("default"), Some(PresetName::Balanced));
        assert_eq!(PresetName::parse("thorough"), Some(PresetName::Thorough));
        assert_eq!(PresetName::parse("ci"), Some(PresetName::Deterministic));
        assert_eq!(PresetName::parse("unknown"), None);
    }

    #[test]
    fn from_str_roundtrip() {
        for &name in PresetName::ALL {
            let parsed: PresetName = name.to_string().parse().unwrap();
            assert_eq!(parsed, name);
        }
    }

    #[test]
    fn test_preset_error_display() {
        let err = "nope".parse::<PresetName>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown preset 'nope'"));
        assert!(msg.contains("thorough"));
    }

    #[test]
    fn every_preset_validates() {
        for &name in PresetName::ALL {
            assert!(validate_config(&get_preset(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn balanced_is_default() {
        assert_eq!(get_preset(PresetName::Balanced), Config::default());
    }

    #[test]
    fn deterministic_has_seed() {
        let config = get_preset(PresetName::Deterministic);
        assert_eq!(config.estimator.seed, Some(DETERMINISTIC_SEED));
        assert_eq!(config.estimator.warm_start_scale, 0.0);
    }

    #[test]
    fn thorough_widens_and_extends() {
        let quick = get_preset(PresetName::Quick);
        let thorough = get_preset(PresetName::Thorough);
        assert!(thorough.estimator.warm_up_samples > quick.estimator.warm_up_samples);
        assert!(thorough.estimator.credible_level > quick.estimator.credible_level);
        assert!(thorough.confidence.min_confidence.is_some());
    }

    #[test]
    fn test_list_presets() {
        let presets = list_presets();
        assert_eq!(presets.len(), 4);
        assert!(presets.iter().any(|p| p.name == "deterministic" && p.seeded));
        assert!(presets.iter().all(|p| !p.description.is_empty()));
    }
}
