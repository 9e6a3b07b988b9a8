//! Configuration loading tests
//!
//! Each test uses its own environment prefix so the tests can run in
//! parallel without seeing each other's variables.

use std::env;
use std::path::PathBuf;

use lazy_di_core::{Error, MissingBranchPolicy};
use lazy_di_infrastructure::config::loader::validate_config;
use lazy_di_infrastructure::config::{ConfigLoader, DiConfig, MissingBranchMode};
use tempfile::TempDir;

fn set_env(key: &str, value: &str) {
    // SAFETY: variable names are unique to the calling test
    unsafe {
        env::set_var(key, value);
    }
}

fn remove_env(key: &str) {
    // SAFETY: variable names are unique to the calling test
    unsafe {
        env::remove_var(key);
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("lazy-di.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = DiConfig::default();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.resolution.missing_branch, MissingBranchMode::AutoCreate);
    assert_eq!(config.loader.file_pattern, r"\.toml$");
    assert_eq!(config.loader.placeholder, "?");
    assert!(config.loader.override_existing);
    assert!(config.loader.dirs.is_empty());
    assert!(config.providers.env);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env_prefix("LAZY_DI_CFG_ABSENT__")
        .load()
        .unwrap();
    assert_eq!(config, DiConfig::default());
}

#[test]
fn test_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [logging]
        level = "debug"

        [resolution]
        missing_branch = "fail"

        [loader]
        dirs = ["items"]
        placeholder = "@"

        [providers]
        env = false
        "#,
    );

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("LAZY_DI_CFG_FILE__")
        .load()
        .unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.resolution.missing_branch, MissingBranchMode::Fail);
    assert_eq!(
        config.resolution.registry_options().missing_branch,
        MissingBranchPolicy::Fail
    );
    assert_eq!(config.loader.dirs, vec![PathBuf::from("items")]);
    assert_eq!(config.loader.placeholder, "@");
    // untouched keys keep their defaults
    assert_eq!(config.loader.file_pattern, r"\.toml$");
    assert!(!config.providers.env);
}

#[test]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[logging]\nlevel = \"debug\"\n");
    set_env("LAZY_DI_CFG_ENV__LOGGING__LEVEL", "warn");
    set_env("LAZY_DI_CFG_ENV__LOADER__OVERRIDE_EXISTING", "false");

    let result = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("LAZY_DI_CFG_ENV__")
        .load();

    remove_env("LAZY_DI_CFG_ENV__LOGGING__LEVEL");
    remove_env("LAZY_DI_CFG_ENV__LOADER__OVERRIDE_EXISTING");

    let config = result.unwrap();
    assert_eq!(config.logging.level, "warn");
    assert!(!config.loader.override_existing);
}

#[test]
fn test_invalid_values_rejected() {
    let mut config = DiConfig::default();
    config.loader.placeholder.clear();
    assert!(matches!(validate_config(&config), Err(Error::Configuration { .. })));

    let mut config = DiConfig::default();
    config.loader.file_pattern = "([".to_string();
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("Invalid loader file pattern"));

    let mut config = DiConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_invalid_file_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[resolution]\nmissing_branch = \"sometimes\"\n");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("LAZY_DI_CFG_BAD__")
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let mut config = DiConfig::default();
    config.loader.files = vec![PathBuf::from("/abs/item.toml")];
    config.resolution.missing_branch = MissingBranchMode::Fail;

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("LAZY_DI_CFG_SAVE__");
    loader.save_to_file(&config, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("missing_branch = \"fail\""));
    assert_eq!(loader.load().unwrap(), config);
}
