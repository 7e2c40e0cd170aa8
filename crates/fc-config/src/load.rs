//! Resolve, read and validate in one step.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::resolve::{resolve_config, ConfigSource};
use crate::validate::{validate_config, ValidationResult};

/// A validated configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Wrap an in-code configuration after validating it.
    pub fn programmatic(config: Config) -> ValidationResult<Self> {
        validate_config(&config)?;
        Ok(Self {
            config,
            source: ConfigSource::Programmatic,
            path: None,
        })
    }
}

/// Resolve the config path (see [`resolve_config`]), load it if one was
/// found, and validate the result. Falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> ValidationResult<LoadedConfig> {
    let resolved = resolve_config(explicit);

    let config = match resolved.path.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    validate_config(&config)?;

    Ok(LoadedConfig {
        config,
        source: resolved.source,
        path: resolved.path,
    })
}
