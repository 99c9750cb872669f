//! Settings persistence through the YAML store.
//!
//! These tests point `FLEET_CONFIG` at a temp file and are serialized.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use fleet_console::application::ports::ConfigStore;
use fleet_console::application::services::settings_service::{load_settings, set_setting};
use fleet_console::domain::ConsoleConfig;
use fleet_console::infra::YamlConfigStore;
use fleet_console::infra::config::CONFIG_ENV;
use serial_test::serial;
use tempfile::TempDir;

fn temp_store() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("config.yaml");
    // SAFETY: every test in this module is #[serial].
    unsafe { std::env::set_var(CONFIG_ENV, &path) };
    (dir, path)
}

#[test]
#[serial]
fn test_missing_file_loads_defaults() {
    let (_dir, path) = temp_store();
    assert_eq!(load_settings(&YamlConfigStore).unwrap(), ConsoleConfig::default());
    assert!(!path.exists());
}

#[test]
#[serial]
fn test_set_persists_and_reloads() {
    let (_dir, path) = temp_store();

    set_setting(&YamlConfigStore, "server.address", "http://fleet.internal:8899/").unwrap();

    assert_eq!(YamlConfigStore.path().unwrap(), path);
    let reloaded = load_settings(&YamlConfigStore).unwrap();
    assert_eq!(reloaded.server.address, "http://fleet.internal:8899");
    assert_eq!(reloaded.server.api_prefix, "api/v1");
}

#[test]
#[serial]
fn test_invalid_value_writes_nothing() {
    let (_dir, path) = temp_store();

    let err = set_setting(&YamlConfigStore, "server.timeout_secs", "0").unwrap_err();

    assert!(err.to_string().contains("server.timeout_secs"));
    assert!(!path.exists());
}

#[test]
#[serial]
fn test_unknown_key_lists_valid_keys() {
    let (_dir, _path) = temp_store();
    let err = set_setting(&YamlConfigStore, "server.colour", "x").unwrap_err();
    assert!(err.to_string().contains("server.api_prefix"));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_store();
    set_setting(&YamlConfigStore, "server.service", "Admin").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
#[serial]
fn test_repeated_saves_leave_only_the_settings_file() {
    let (_dir, path) = temp_store();
    let parent = path.parent().unwrap().to_path_buf();
    std::fs::create_dir_all(&parent).unwrap();
    // Another writer's staging file must not be clobbered or reused.
    let foreign = parent.join("config.yaml.tmp");
    std::fs::write(&foreign, "other writer").unwrap();

    set_setting(&YamlConfigStore, "server.service", "Admin").unwrap();
    set_setting(&YamlConfigStore, "server.timeout_secs", "45").unwrap();

    let mut names: Vec<String> = std::fs::read_dir(&parent)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["config.yaml", "config.yaml.tmp"]);
    assert_eq!(std::fs::read_to_string(&foreign).unwrap(), "other writer");

    let reloaded = load_settings(&YamlConfigStore).unwrap();
    assert_eq!(reloaded.server.service, "Admin");
    assert_eq!(reloaded.server.timeout_secs, 45);
}
