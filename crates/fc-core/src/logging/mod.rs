//! Structured logging for fluent-check.
//!
//! The library crates only emit `tracing` events; nothing is printed unless
//! a subscriber is installed. [`init_logging`] installs one on stderr in
//! either human or JSONL form:
//!
//! ```no_run
//! use fc_core::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env());
//! ```
//!
//! Events emitted by the estimator:
//! - `debug`: filter warm-up complete, shrink evidence transfer, chain
//!   bounds, map collision correction, stopping decisions
//! - `trace`: each rejected draw
//! - `warn`: normal-approximation fallback, rejection limit reached

pub mod config;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use layer::JsonlLayer;

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` directives take precedence over `config.level` when set.
/// Returns false if a subscriber was already installed, so repeated calls
/// (for example from several tests) are harmless.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directives()));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Human => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                registry.with(fmt_layer).try_init()
            } else {
                registry.with(fmt_layer.without_time()).try_init()
            }
        }
        LogFormat::Jsonl => registry.with(JsonlLayer::stderr()).try_init(),
    };
    result.is_ok()
}

/// `init_logging(&LogConfig::from_env())`.
pub fn init_default_logging() -> bool {
    init_logging(&LogConfig::from_env())
}
