//! Tests for layered configuration loading.

use datadupe::config::Config;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// Environment variables are process-wide
static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_missing_file_gives_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let config = Config::load_from_path(dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_file_overrides_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "threshold = 75\nthreads = 3\n").unwrap();

    let config = Config::load_from_path(path);
    assert_eq!(config.threshold, 75);
    assert_eq!(config.threads, 3);
    assert!(config.progress);
}

#[test]
fn test_env_overrides_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "threshold = 75\n").unwrap();

    std::env::set_var("DATADUPE_THRESHOLD", "60");
    let config = Config::load_from_path(path);
    std::env::remove_var("DATADUPE_THRESHOLD");

    assert_eq!(config.threshold, 60);
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "threshold = \"high\"\n").unwrap();

    assert_eq!(Config::load_from_path(path), Config::default());
}

#[test]
fn test_save_and_reload() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config {
        threshold: 42,
        threads: 1,
        progress: false,
    };

    config.save_to(&path).unwrap();
    assert_eq!(Config::load_from_path(path), config);
}
