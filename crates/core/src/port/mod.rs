// Port Layer - Capability interfaces for every external effect a probe needs

pub mod command_executor;
pub mod dependencies;
pub mod file_system;
pub mod hardware_facade;
pub mod identity;
pub mod network_facade;
pub mod probe;

// Re-exports
pub use command_executor::CommandExecutor;
pub use dependencies::HostDependencies;
pub use file_system::FileSystem;
pub use hardware_facade::HardwareFacade;
pub use identity::IdentityResolver;
pub use network_facade::{InterfaceSnapshot, NetworkFacade, NetworkInterface};
pub use probe::Probe;
