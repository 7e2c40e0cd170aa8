//! From a config file on disk to runtime settings and reproducible runs.

use std::fs;

use fc_config::{load_config, ConfigSnapshot, ConfigSource};
use fc_core::{integer, ArbitraryExt, ErrorCategory, Settings, StopReason, StoppingRule, Verdict};
use fc_math::bernoulli::BetaParams;
use tempfile::TempDir;

const SEEDED_TOML: &str = r#"
[estimator]
prior = "jeffreys"
warm_up_samples = 300
warm_start_scale = 0.5
seed = 42

[confidence]
pass_rate_threshold = 0.9
check_interval = 50
"#;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn file_settings_reach_the_engines() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "fc.toml", SEEDED_TOML);
    let loaded = load_config(Some(&path)).unwrap();
    assert_eq!(loaded.source, ConfigSource::Explicit);

    let settings = Settings::try_from(&loaded.config).unwrap();
    assert_eq!(settings.estimator.prior(), BetaParams::jeffreys());
    assert_eq!(settings.estimator.warm_up_samples(), 300);
    assert_eq!(settings.estimator.seed(), Some(42));
    assert_eq!(settings.confidence.check_interval(), 50);

    let summary = StoppingRule::new(settings.confidence).run(|| Verdict::Pass);
    assert_eq!(summary.reason, StopReason::Confident);
    assert_eq!(summary.tracker.observations(), 50);
}

#[test]
fn seeded_config_reproduces_sizes() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "fc.toml", SEEDED_TOML);
    let settings = Settings::try_from(&load_config(Some(&path)).unwrap().config).unwrap();

    let build = || integer(0, 5000).filter(|v| v % 7 == 3, &settings.estimator).size();
    assert_eq!(build(), build());
}

#[test]
fn snapshot_identifies_the_run() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "fc.toml", SEEDED_TOML);
    let loaded = load_config(Some(&path)).unwrap();

    let snapshot = ConfigSnapshot::from_loaded(&loaded).unwrap();
    assert_eq!(snapshot.seed, Some(42));
    let restored = ConfigSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert!(restored.matches(&snapshot));

    let other = write_config(&dir, "other.json", r#"{"estimator": {"seed": 7}}"#);
    let other = ConfigSnapshot::from_loaded(&load_config(Some(&other)).unwrap()).unwrap();
    assert!(!other.matches(&snapshot));
}

#[test]
fn invalid_config_maps_to_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "fc.toml", SEEDED_TOML);
    let mut config = load_config(Some(&path)).unwrap().config;
    config.estimator.warm_start_scale = 1.5;

    let err = Settings::try_from(&config).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Config);
}
