//! Fuzz target for TOML configuration parsing.
//!
//! Parsing must never panic, and any document that validates must convert
//! into runtime settings.

#![no_main]

use fc_config::{validate_config, Config};
use fc_core::Settings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = toml::from_str::<Config>(text) else {
        return;
    };
    if validate_config(&config).is_ok() {
        assert!(Settings::try_from(&config).is_ok());
    }
});
