// Hostcap Infrastructure - System Adapters
// Implements: CommandExecutor, NetworkFacade, HardwareFacade, IdentityResolver, FileSystem

pub mod dependencies;
pub mod file_system;
pub mod identity;
pub mod inventory;
pub mod network;
pub mod process_executor;

pub use dependencies::SystemDependencies;
pub use file_system::OsFileSystem;
pub use identity::HostIdentity;
pub use inventory::SysfsInventory;
pub use network::SystemNetwork;
pub use process_executor::{ElevationWrapper, ProcessExecutor};
