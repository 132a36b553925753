// Identity resolver - OS hostname with dry-run substitution
use tracing::debug;

use hostcap_core::domain::DryRunConfig;
use hostcap_core::error::{HostError, Result};
use hostcap_core::port::IdentityResolver;

/// Hostname resolver
///
/// With dry-run enabled the forced hostname is returned and the OS is never
/// queried.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    dry_run: DryRunConfig,
}

impl HostIdentity {
    pub fn new(dry_run: DryRunConfig) -> Self {
        Self { dry_run }
    }

    pub fn dry_run(&self) -> &DryRunConfig {
        &self.dry_run
    }
}

/// Hostname as reported by the kernel
pub fn os_hostname() -> Result<String> {
    let name = nix::unistd::gethostname().map_err(|e| HostError::Io(e.into()))?;
    name.into_string()
        .map_err(|raw| HostError::Parse(format!("hostname is not valid UTF-8: {:?}", raw)))
}

impl IdentityResolver for HostIdentity {
    fn hostname(&self) -> Result<String> {
        if self.dry_run.enabled {
            debug!(hostname = %self.dry_run.forced_hostname, "Using forced hostname");
            return Ok(self.dry_run.forced_hostname.clone());
        }

        os_hostname()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_hostname_when_dry_run() {
        let identity = HostIdentity::new(DryRunConfig::with_hostname("master-0.example.com"));
        assert_eq!(identity.hostname().unwrap(), "master-0.example.com");
    }

    #[test]
    fn test_forced_hostname_ignores_os_value() {
        let real = os_hostname().unwrap();
        let forced = format!("not-{}", real);
        let identity = HostIdentity::new(DryRunConfig::with_hostname(forced.clone()));
        assert_eq!(identity.hostname().unwrap(), forced);
    }

    #[test]
    fn test_disabled_dry_run_matches_os() {
        let identity = HostIdentity::new(DryRunConfig::disabled());
        assert_eq!(identity.hostname().unwrap(), os_hostname().unwrap());
    }

    #[test]
    fn test_disabled_dry_run_ignores_forced_value() {
        let identity = HostIdentity::new(DryRunConfig {
            enabled: false,
            forced_hostname: "ignored".to_string(),
        });
        assert_eq!(identity.hostname().unwrap(), os_hostname().unwrap());
    }
}
