// Free-addresses probe: which host addresses of a subnet nobody answers on
// Scanning is delegated to nmap through the CommandExecutor port

pub mod model;
pub mod scan;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn, Span};

use hostcap_core::domain::ExecutionResult;
use hostcap_core::port::{CommandExecutor, Probe};

pub use model::{FreeNetworkAddresses, FreeNetworksAddressesRequest};

/// Networks with a shorter prefix are skipped (a /22 is 1022 hosts)
pub const MIN_PREFIX_LEN: u8 = 22;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Invalid network {network:?}: {reason}")]
    InvalidNetwork { network: String, reason: String },
}

/// Probe answering a [`FreeNetworksAddressesRequest`] with the free addresses
/// of each listed IPv4 network
#[derive(Debug, Clone)]
pub struct FreeAddressesProbe {
    scanner: String,
}

impl FreeAddressesProbe {
    pub fn new() -> Self {
        Self::with_scanner("nmap")
    }

    /// Use an alternate nmap-compatible binary
    pub fn with_scanner(scanner: impl Into<String>) -> Self {
        Self {
            scanner: scanner.into(),
        }
    }

    async fn scan_network(
        &self,
        network: &str,
        executor: &dyn CommandExecutor,
        log: &Span,
    ) -> Result<Option<FreeNetworkAddresses>, ExecutionResult> {
        let (net, prefix) = match scan::parse_ipv4_network(network) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(parent: log, network = %network, error = %e, "Rejecting network");
                return Err(ExecutionResult::failure(e.to_string()));
            }
        };

        if prefix < MIN_PREFIX_LEN {
            warn!(
                parent: log,
                network = %network,
                prefix,
                "Network too large to scan, skipping"
            );
            return Ok(None);
        }

        let result = executor
            .execute(&self.scanner, &["-sn", "-PR", "-n", "-oG", "-", &net.to_string()])
            .await;
        if !result.is_success() {
            warn!(
                parent: log,
                network = %network,
                exit_code = result.exit_code,
                stderr = %result.stderr,
                "Scan failed"
            );
            return Err(result);
        }

        let up = scan::hosts_up(&result.stdout);
        let free_addresses: Vec<String> = scan::host_addresses(net)
            .filter(|addr| !up.contains(addr))
            .map(|addr| addr.to_string())
            .collect();

        info!(
            parent: log,
            network = %network,
            up = up.len(),
            free = free_addresses.len(),
            "Scanned network"
        );

        Ok(Some(FreeNetworkAddresses {
            network: network.to_string(),
            free_addresses,
        }))
    }
}

impl Default for FreeAddressesProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for FreeAddressesProbe {
    async fn run(
        &self,
        target: &str,
        executor: &dyn CommandExecutor,
        log: &Span,
    ) -> ExecutionResult {
        let request: FreeNetworksAddressesRequest = match serde_json::from_str(target) {
            Ok(request) => request,
            Err(e) => {
                let err = ProbeError::InvalidRequest(e);
                warn!(parent: log, error = %err, "Failed to parse request");
                return ExecutionResult::failure(err.to_string());
            }
        };

        let mut response = Vec::with_capacity(request.networks.len());
        for network in &request.networks {
            match self.scan_network(network, executor, log).await {
                Ok(Some(free)) => response.push(free),
                Ok(None) => {}
                Err(failed) => return failed,
            }
        }

        match serde_json::to_string(&response) {
            Ok(body) => ExecutionResult::success(body),
            Err(e) => ExecutionResult::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcap_core::domain::SPAWN_FAILURE_EXIT_CODE;
    use hostcap_core::port::command_executor::mocks::ScriptedExecutor;

    const NMAP_OUTPUT: &str = "\
# Nmap 7.92 scan initiated as: nmap -sn -PR -n -oG - 192.168.1.0/29
Host: 192.168.1.1 ()\tStatus: Up
Host: 192.168.1.4 ()\tStatus: Up
# Nmap done -- 8 IP addresses (2 hosts up) scanned in 1.71 seconds
";

    fn unwrap_response(result: ExecutionResult) -> Vec<FreeNetworkAddresses> {
        assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
        serde_json::from_str(&result.stdout).unwrap()
    }

    #[tokio::test]
    async fn test_reports_addresses_not_up() {
        let executor =
            ScriptedExecutor::new().with_response("nmap", ExecutionResult::success(NMAP_OUTPUT));
        let probe = FreeAddressesProbe::new();

        let result = probe
            .run(r#"{"networks":["192.168.1.0/29"]}"#, &executor, &Span::none())
            .await;
        let response = unwrap_response(result);

        assert_eq!(response.len(), 1);
        assert_eq!(response[0].network, "192.168.1.0/29");
        assert_eq!(
            response[0].free_addresses,
            vec!["192.168.1.2", "192.168.1.3", "192.168.1.5", "192.168.1.6"]
        );

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].privileged);
        assert_eq!(calls[0].args.last().unwrap(), "192.168.1.0/29");
    }

    #[tokio::test]
    async fn test_large_networks_are_skipped() {
        let executor = ScriptedExecutor::new();
        let probe = FreeAddressesProbe::new();

        let result = probe
            .run(r#"{"networks":["10.0.0.0/8"]}"#, &executor, &Span::none())
            .await;

        assert!(unwrap_response(result).is_empty());
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_request_is_failure_triple() {
        let probe = FreeAddressesProbe::new();
        let result = probe
            .run("192.168.1.0/24", &ScriptedExecutor::new(), &Span::none())
            .await;

        assert_eq!(result.exit_code, SPAWN_FAILURE_EXIT_CODE);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn test_invalid_network_is_failure_triple() {
        let probe = FreeAddressesProbe::new();
        let result = probe
            .run(r#"{"networks":["fe80::/64"]}"#, &ScriptedExecutor::new(), &Span::none())
            .await;

        assert_eq!(result.exit_code, SPAWN_FAILURE_EXIT_CODE);
        assert!(result.stderr.contains("fe80::/64"));
    }

    #[tokio::test]
    async fn test_scanner_failure_is_relayed() {
        let executor = ScriptedExecutor::new()
            .with_response("nmap", ExecutionResult::new("", "QUITTING!\n", 1));
        let probe = FreeAddressesProbe::new();

        let result = probe
            .run(r#"{"networks":["192.168.1.0/24"]}"#, &executor, &Span::none())
            .await;

        assert_eq!(result, ExecutionResult::new("", "QUITTING!\n", 1));
    }

    #[tokio::test]
    async fn test_missing_scanner_is_failure_triple() {
        let probe = FreeAddressesProbe::new();
        let result = probe
            .run(r#"{"networks":["192.168.1.0/24"]}"#, &ScriptedExecutor::new(), &Span::none())
            .await;

        assert_eq!(result.exit_code, SPAWN_FAILURE_EXIT_CODE);
        assert!(result.stderr.contains("nmap"));
    }
}
