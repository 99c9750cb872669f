//! Commands that never contact the server.

#![allow(clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::TempDir;

use crate::harness::{fleetctl, json_stdout};

const PIPELINE: &str = "inputs:\n  - Type: input_file\nflushers:\n  - Type: flusher_stdout\n";

#[test]
fn test_validate_accepts_pipeline() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("pipeline.yaml");
    std::fs::write(&file, PIPELINE).unwrap();

    fleetctl(&home)
        .args(["config", "validate"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("is a valid config detail"));
}

#[test]
fn test_validate_reads_stdin() {
    let home = TempDir::new().unwrap();
    fleetctl(&home)
        .args(["config", "validate", "-"])
        .write_stdin(PIPELINE)
        .assert()
        .success();
}

#[test]
fn test_validate_rejects_missing_flushers() {
    let home = TempDir::new().unwrap();
    fleetctl(&home)
        .args(["config", "validate", "-"])
        .write_stdin("inputs:\n  - Type: input_file\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'flushers' is required"));
}

#[test]
fn test_agent_type_only_needs_yaml() {
    let home = TempDir::new().unwrap();
    fleetctl(&home)
        .args(["config", "validate", "-", "--type", "agent"])
        .write_stdin("log_level: info\n")
        .assert()
        .success();
}

#[test]
fn test_schema_lists_actions_as_json() {
    let home = TempDir::new().unwrap();
    let output = fleetctl(&home).args(["--json", "schema"]).output().unwrap();
    assert!(output.status.success());

    let actions = json_stdout(&output);
    let actions = actions.as_array().unwrap();
    assert_eq!(actions[0]["action"], "CreateAgentGroup");
    assert_eq!(actions[0]["method"], "POST");
    assert!(
        actions.iter().any(|a| a["endpoint"]
            == "http://127.0.0.1:8899/api/v1/User/GetAppliedConfigsForAgentGroup")
    );
}

#[test]
fn test_schema_describes_one_action() {
    let home = TempDir::new().unwrap();
    let output = fleetctl(&home)
        .args(["--json", "schema", "ApplyConfigToAgentGroup"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc = json_stdout(&output);
    assert_eq!(doc["method"], "PUT");
    assert_eq!(doc["request"]["fields"][0], "request_id");
}

#[test]
fn test_schema_unknown_action_is_error_document() {
    let home = TempDir::new().unwrap();
    let output = fleetctl(&home)
        .args(["--json", "schema", "DropTables"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let doc = json_stdout(&output);
    assert_eq!(doc["error"], true);
    assert_eq!(doc["code"], "E_COMMAND");
    assert!(doc["message"].as_str().unwrap().contains("DropTables"));
}

#[test]
fn test_settings_set_then_get() {
    let home = TempDir::new().unwrap();
    fleetctl(&home)
        .args(["settings", "set", "server.service", "Admin"])
        .assert()
        .success();

    let output = fleetctl(&home)
        .args(["--json", "settings", "get", "server.service"])
        .output()
        .unwrap();
    assert_eq!(
        json_stdout(&output),
        serde_json::json!({ "key": "server.service", "value": "Admin" })
    );
    assert!(home.path().join("config.yaml").exists());
}

#[test]
fn test_settings_show_reports_defaults() {
    let home = TempDir::new().unwrap();
    let output = fleetctl(&home)
        .args(["--json", "settings", "show"])
        .output()
        .unwrap();
    let doc = json_stdout(&output);
    assert_eq!(doc["settings"]["server"]["address"], "http://127.0.0.1:8899");
    assert_eq!(doc["settings"]["server"]["timeout_secs"], 30);
}

#[test]
fn test_settings_set_rejects_bad_timeout() {
    let home = TempDir::new().unwrap();
    fleetctl(&home)
        .args(["settings", "set", "server.timeout_secs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and"));
    assert!(!home.path().join("config.yaml").exists());
}

#[test]
fn test_console_refuses_json_mode() {
    let home = TempDir::new().unwrap();
    fleetctl(&home)
        .args(["--json", "console", "group", "default"])
        .assert()
        .failure();
}
