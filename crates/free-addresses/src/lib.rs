//! free_addresses - single-invocation probe runner
//!
//! Parses configuration, builds the capability layer once, runs exactly one
//! probe and relays its (stdout, stderr, exit code) verbatim.

pub mod config;
pub mod entry;
pub mod logging;

pub use config::SubprocessArgs;
pub use entry::{exit_status, run_probe, USAGE_EXIT_CODE};
