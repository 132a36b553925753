//! The free-addresses probe driven through full capability layers

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use hostcap_core::domain::{DryRunConfig, ExecutionResult};
use hostcap_core::port::command_executor::mocks::ScriptedExecutor;
use hostcap_core::port::dependencies::mocks::FakeDependencies;
use hostcap_core::port::Probe;
use hostcap_infra_system::SystemDependencies;
use hostcap_probe_free_addresses::{FreeAddressesProbe, FreeNetworkAddresses};
use tempfile::TempDir;
use tracing::Span;

const NMAP_OUTPUT: &str = "\
# Nmap 7.92 scan initiated as: nmap -sn -PR -n -oG - 10.1.0.0/30
Host: 10.1.0.1 ()\tStatus: Up
# Nmap done -- 4 IP addresses (1 host up) scanned in 0.52 seconds
";

/// Shell script standing in for nmap; prints the canned scan
fn fake_scanner(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("nmap");
    fs::write(
        &path,
        format!("#!/bin/sh\ncat <<'SCAN'\n{}SCAN\n", NMAP_OUTPUT),
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_probe_against_fake_layer() {
    let deps = FakeDependencies::new(DryRunConfig::disabled(), "").with_executor(
        ScriptedExecutor::new().with_response("nmap", ExecutionResult::success(NMAP_OUTPUT)),
    );

    let result = FreeAddressesProbe::new()
        .run(r#"{"networks":["10.1.0.0/30"]}"#, &deps, &Span::none())
        .await;

    assert_eq!(result.exit_code, 0);
    let response: Vec<FreeNetworkAddresses> = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(response[0].free_addresses, vec!["10.1.0.2"]);
    assert_eq!(deps.executor.call_count(), 1);
}

#[tokio::test]
async fn test_probe_against_system_layer() {
    let dir = TempDir::new().unwrap();
    let scanner = fake_scanner(&dir);
    let deps = SystemDependencies::new(DryRunConfig::disabled(), "");

    let result = FreeAddressesProbe::with_scanner(scanner.to_string_lossy())
        .run(r#"{"networks":["10.1.0.0/30"]}"#, &deps, &Span::none())
        .await;

    assert_eq!(result.stderr, "");
    assert_eq!(result.exit_code, 0);
    assert_eq!(
        result.stdout,
        r#"[{"network":"10.1.0.0/30","free_addresses":["10.1.0.2"]}]"#
    );
}

#[tokio::test]
async fn test_scanner_failure_is_relayed_unchanged() {
    let deps = FakeDependencies::new(DryRunConfig::disabled(), "").with_executor(
        ScriptedExecutor::new().with_response(
            "nmap",
            ExecutionResult::new("", "Failed to open device eth9\n", 1),
        ),
    );

    let result = FreeAddressesProbe::new()
        .run(r#"{"networks":["10.1.0.0/30"]}"#, &deps, &Span::none())
        .await;

    assert_eq!(result.exit_code, 1);
    assert_eq!(result.stderr, "Failed to open device eth9\n");
}
