// Dry-run configuration

use serde::{Deserialize, Serialize};

/// Simulation settings, fixed for the lifetime of one process invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunConfig {
    pub enabled: bool,
    /// Hostname reported instead of the OS one when `enabled` is set.
    /// May be empty, in which case the empty string is reported.
    pub forced_hostname: String,
}

impl DryRunConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_hostname(hostname: impl Into<String>) -> Self {
        Self {
            enabled: true,
            forced_hostname: hostname.into(),
        }
    }

    /// Enabled without a forced hostname (accepted, but almost always a mistake)
    pub fn is_missing_hostname(&self) -> bool {
        self.enabled && self.forced_hostname.is_empty()
    }
}
