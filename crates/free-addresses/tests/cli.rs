//! Binary-level checks of the free_addresses executable

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn free_addresses(log_file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("free_addresses").unwrap();
    cmd.env("HOSTCAP_LOG_FILE", log_file)
        .env("HOSTCAP_JOURNAL_LOGGING", "false")
        .env_remove("RUST_LOG")
        .env_remove("DRY_ENABLE")
        .env_remove("HOSTCAP_STDERR_LOGGING");
    cmd
}

#[test]
fn no_arguments_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("free_addresses.log");

    free_addresses(&log_file)
        .assert()
        .code(64)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    let logs = std::fs::read_to_string(&log_file).unwrap();
    assert!(logs.contains("Expecting exactly single argument to free_addresses. Received 0"));
}

#[test]
fn two_arguments_is_usage_error() {
    let dir = TempDir::new().unwrap();

    free_addresses(&dir.path().join("free_addresses.log"))
        .args(["{}", "{}"])
        .assert()
        .code(64)
        .stdout(predicate::str::is_empty());
}

#[test]
fn skipped_network_yields_empty_list() {
    let dir = TempDir::new().unwrap();

    free_addresses(&dir.path().join("free_addresses.log"))
        .arg(r#"{"networks":["10.0.0.0/8"]}"#)
        .assert()
        .success()
        .stdout("[]")
        .stderr(predicate::str::is_empty());
}

#[test]
fn malformed_request_fails_with_sentinel() {
    let dir = TempDir::new().unwrap();

    free_addresses(&dir.path().join("free_addresses.log"))
        .arg("not json")
        .assert()
        .code(255)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid request"));
}
