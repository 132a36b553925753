// Domain Layer - Plain data exchanged through the capability ports

pub mod dry_run;
pub mod execution;
pub mod file_info;
pub mod hardware;
pub mod network;

// Re-exports
pub use dry_run::DryRunConfig;
pub use execution::{ExecutionResult, SPAWN_FAILURE_EXIT_CODE};
pub use file_info::FileInfo;
pub use hardware::{
    BlockInfo, ChassisInfo, Disk, DriveType, GpuCard, GpuInfo, MemoryInfo, Partition, PciDevice,
    PciInfo, ProductInfo, QueryOptions, StorageController, UNKNOWN,
};
pub use network::{AddressFamily, HardwareAddr, InterfaceFlags, Link, Route};
