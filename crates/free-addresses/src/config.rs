//! Command-line and environment configuration

use clap::{ArgAction, Args, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{warn, Span};

use hostcap_core::domain::DryRunConfig;

pub const DEFAULT_LOG_FILE: &str = "/var/log/free_addresses.log";

#[derive(Parser, Debug, Clone)]
#[command(name = "free_addresses")]
#[command(about = "Report unused IPv4 addresses in the requested networks", long_about = None)]
#[command(version)]
pub struct SubprocessArgs {
    #[command(flatten)]
    pub dry_run: DryRunArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Alternate filesystem root for hardware queries (empty = live root)
    #[arg(long, env = "HOSTCAP_HARDWARE_ROOT", default_value = "")]
    pub hardware_root: String,

    /// Probe target, e.g. '{"networks":["192.168.1.0/24"]}'
    ///
    /// Exactly one is expected; the count is checked by the entry point.
    #[arg(num_args = 0..)]
    pub targets: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DryRunArgs {
    /// Enable dry-run (simulation) mode
    #[arg(long = "dry-run", env = "DRY_ENABLE")]
    pub enabled: bool,

    /// Hostname reported while dry-run is enabled
    #[arg(long = "dry-forced-hostname", env = "DRY_FORCED_HOSTNAME", default_value = "")]
    pub forced_hostname: String,

    /// Host id attached to every log event
    #[arg(long = "dry-forced-host-id", env = "DRY_FORCED_HOST_ID")]
    pub forced_host_id: Option<String>,
}

impl DryRunArgs {
    pub fn to_config(&self) -> DryRunConfig {
        DryRunConfig {
            enabled: self.enabled,
            forced_hostname: self.forced_hostname.clone(),
        }
    }

    /// Accepted as-is; an empty forced hostname is reported, not rejected
    pub fn warn_if_incomplete(&self, log: &Span) {
        if self.to_config().is_missing_hostname() {
            warn!(
                parent: log,
                "Dry-run enabled without a forced hostname, an empty hostname will be reported"
            );
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    /// Write logs to the text log file
    #[arg(long, env = "HOSTCAP_TEXT_LOGGING", default_value_t = true, action = ArgAction::Set)]
    pub text_logging: bool,

    /// Text log file location
    #[arg(long, env = "HOSTCAP_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Send logs to the systemd journal (skipped when no journal is reachable)
    #[arg(long, env = "HOSTCAP_JOURNAL_LOGGING", default_value_t = true, action = ArgAction::Set)]
    pub journal_logging: bool,

    /// Also write logs to stderr (mixes with the probe's own stderr)
    #[arg(long, env = "HOSTCAP_STDERR_LOGGING")]
    pub stderr_logging: bool,

    #[arg(long, env = "HOSTCAP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Default for LoggingArgs {
    fn default() -> Self {
        Self {
            text_logging: true,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            journal_logging: true,
            stderr_logging: false,
            log_format: LogFormat::Pretty,
        }
    }
}
