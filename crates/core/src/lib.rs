// Hostcap Core - Domain types & capability ports
// NO OS access here: adapters live in hostcap-infra-system

pub mod domain;
pub mod error;
pub mod port;

pub use error::{HostError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
