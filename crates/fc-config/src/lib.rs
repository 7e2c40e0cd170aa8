//! fluent-check estimation configuration.
//!
//! This crate provides:
//! - Typed Rust structs for the estimator and confidence sections
//! - Config resolution (explicit path → env → XDG → defaults)
//! - TOML/JSON loading and semantic validation
//! - Named presets
//! - Config snapshots for reproducing an estimation run

pub mod confidence;
pub mod config;
pub mod estimator;
pub mod load;
pub mod preset;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use confidence::ConfidenceConfig;
pub use config::Config;
pub use estimator::{EstimatorConfig, IntervalModel, PriorSpec};
pub use load::{load_config, LoadedConfig};
pub use preset::{get_preset, PresetName};
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
