//! Service configuration loading
//!
//! Tests touching process environment run under `#[serial]`.

use serial_test::serial;
use std::path::{Path, PathBuf};
use tariff_classifier::config::{CORPUS_PATH_ENV_VAR, LOG_LEVEL_ENV_VAR};
use tariff_classifier::{ClassifierConfig, ClassifierError, ServiceConfig};

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("classifier.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn clear_env() {
    std::env::remove_var(CORPUS_PATH_ENV_VAR);
    std::env::remove_var(LOG_LEVEL_ENV_VAR);
}

#[test]
#[serial]
fn test_full_file_loads() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[logging]
level = "debug"

[corpus]
path = "/srv/tariff/reference.db"

[classifier]
result_limit = 5

[classifier.corpus_search]
lookup_timeout_ms = 750
confidence_floor = 55

[classifier.algorithmic]
decrement = 4
"#,
    );

    let config = ServiceConfig::load(Some(&path)).unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.corpus.path,
        Some(PathBuf::from("/srv/tariff/reference.db"))
    );
    assert_eq!(config.classifier.result_limit, 5);
    assert_eq!(config.classifier.corpus_search.lookup_timeout_ms, 750);
    assert_eq!(config.classifier.corpus_search.confidence_floor, 55);
    // Unspecified fields keep their defaults
    assert_eq!(config.classifier.corpus_search.confidence_ceiling, 98);
    assert_eq!(config.classifier.algorithmic.decrement, 4);
    assert_eq!(config.classifier.algorithmic.material_start, 75);
    assert_eq!(config.classifier.static_patterns, ClassifierConfig::default().static_patterns);
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    let config = ServiceConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();

    assert_eq!(config.classifier, ClassifierConfig::default());
    assert_eq!(config.corpus.path, None);
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn test_malformed_file_is_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[classifier\nresult_limit = ");

    assert!(ServiceConfig::load(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_invalid_engine_settings_rejected() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[classifier.static_patterns]
static_confidence = 40
hint_confidence = 50
"#,
    );

    let result = ServiceConfig::load(Some(&path));
    assert!(matches!(result, Err(ClassifierError::Config(_))));
}

#[test]
#[serial]
fn test_invalid_log_level_rejected() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[logging]\nlevel = \"chatty\"\n");

    assert!(ServiceConfig::load(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[logging]
level = "warn"

[corpus]
path = "/srv/tariff/from-file.json"
"#,
    );

    std::env::set_var(CORPUS_PATH_ENV_VAR, "/srv/tariff/from-env.db");
    std::env::set_var(LOG_LEVEL_ENV_VAR, "trace");
    let config = ServiceConfig::load(Some(&path));
    clear_env();

    let config = config.unwrap();
    assert_eq!(
        config.corpus.path,
        Some(PathBuf::from("/srv/tariff/from-env.db"))
    );
    assert_eq!(config.logging.level, "trace");
}

#[test]
#[serial]
fn test_blank_env_ignored() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[corpus]\npath = \"/srv/tariff/from-file.json\"\n");

    std::env::set_var(CORPUS_PATH_ENV_VAR, "   ");
    let config = ServiceConfig::load(Some(&path));
    clear_env();

    assert_eq!(
        config.unwrap().corpus.path,
        Some(PathBuf::from("/srv/tariff/from-file.json"))
    );
}
