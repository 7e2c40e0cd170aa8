//! Logging configuration.
//!
//! Read from the environment:
//! - `FC_LOG`: level (`trace`, `debug`, `info`, `warn`, `error`, `off`)
//! - `RUST_LOG`: consulted for a level when `FC_LOG` is unset
//! - `FC_LOG_FORMAT`: `human` or `jsonl`

use serde::{Deserialize, Serialize};

pub const ENV_LOG_LEVEL: &str = "FC_LOG";
pub const ENV_LOG_FORMAT: &str = "FC_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "human" | "pretty" | "text" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Minimum level emitted by the library crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Numeric fallbacks and exhausted filters surface here.
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Off,
    ];

    /// Most verbose level named anywhere in an `EnvFilter` directive string.
    fn from_directives(directives: &str) -> Option<LogLevel> {
        directives
            .split(',')
            .filter_map(|d| d.rsplit('=').next())
            .filter_map(|lvl| lvl.parse::<LogLevel>().ok())
            .min()
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        LogLevel::ALL
            .into_iter()
            .find(|l| l.to_string() == lower)
            .or(match lower.as_str() {
                "warning" => Some(LogLevel::Warn),
                "none" | "quiet" => Some(LogLevel::Off),
                _ => None,
            })
            .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        };
        f.write_str(s)
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: true,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable values are
    /// ignored.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = LogConfig::default();

        let level = match lookup(ENV_LOG_LEVEL) {
            Some(val) => val.parse::<LogLevel>().ok(),
            None => lookup("RUST_LOG").and_then(|val| LogLevel::from_directives(&val)),
        };
        if let Some(level) = level {
            config.level = level;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT).and_then(|v| v.parse().ok()) {
            config.format = format;
        }
        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// `EnvFilter` directives covering the workspace crates.
    pub fn directives(&self) -> String {
        format!("fc_core={0},fc_math={0},fc_config={0}", self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_formats_and_levels() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Jsonl));
        assert_eq!("human".parse::<LogFormat>(), Ok(LogFormat::Human));
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("quiet".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert_eq!(" Debug ".parse::<LogLevel>(), Ok(LogLevel::Debug));
    }

    #[test]
    fn fc_log_wins_over_rust_log() {
        let config = LogConfig::from_vars(vars(&[("FC_LOG", "trace"), ("RUST_LOG", "error")]));
        assert_eq!(config.level, LogLevel::Trace);
    }

    #[test]
    fn rust_log_directives_pick_most_verbose() {
        let config = LogConfig::from_vars(vars(&[("RUST_LOG", "warn,fc_core=debug")]));
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn format_from_env_and_defaults() {
        let config = LogConfig::from_vars(vars(&[("FC_LOG_FORMAT", "jsonl")]));
        assert_eq!(config.format, LogFormat::Jsonl);
        assert_eq!(config.level, LogLevel::Warn);

        let config = LogConfig::from_vars(vars(&[("FC_LOG", "loud")]));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn directives_name_each_crate() {
        let d = LogConfig::default().with_level(LogLevel::Debug).directives();
        assert_eq!(d, "fc_core=debug,fc_math=debug,fc_config=debug");
    }
}
