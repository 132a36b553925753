// Hardware inventory domain types and the query option bag

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder for attributes the platform does not expose
pub const UNKNOWN: &str = "unknown";

/// Named modifiers accepted by every hardware query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Alternate filesystem root; overrides the layer's hardware root
    pub chroot: Option<PathBuf>,
    /// Suppress warnings about missing attributes
    pub disable_warnings: bool,
}

impl QueryOptions {
    pub fn with_chroot(mut self, root: impl Into<PathBuf>) -> Self {
        self.chroot = Some(root.into());
        self
    }

    pub fn without_warnings(mut self) -> Self {
        self.disable_warnings = true;
        self
    }

    /// Root the query resolves against: explicit chroot, then `default_root`,
    /// with an empty path meaning the live root
    pub fn effective_root(&self, default_root: &str) -> PathBuf {
        let root = match &self.chroot {
            Some(p) => p.as_path(),
            None => Path::new(default_root),
        };
        if root.as_os_str().is_empty() {
            PathBuf::from("/")
        } else {
            root.to_path_buf()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveType {
    Hdd,
    Ssd,
    Odd,
    Fdd,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageController {
    Nvme,
    Scsi,
    Virtio,
    Ide,
    Mmc,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    pub name: String,
    pub size_bytes: u64,
    pub drive_type: DriveType,
    pub storage_controller: StorageController,
    pub removable: bool,
    pub model: String,
    pub vendor: String,
    pub serial_number: String,
    pub wwn: String,
    pub partitions: Vec<Partition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub total_physical_bytes: u64,
    pub disks: Vec<Disk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub family: String,
    pub name: String,
    pub vendor: String,
    pub serial_number: String,
    pub uuid: String,
    pub sku: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisInfo {
    pub asset_tag: String,
    pub serial_number: String,
    /// Numeric SMBIOS chassis type, as a string
    pub chassis_type: String,
    pub vendor: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_physical_bytes: u64,
    pub total_usable_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciDevice {
    /// Domain:bus:device.function, e.g. `0000:00:02.0`
    pub address: String,
    pub vendor_id: String,
    pub product_id: String,
    pub class_id: String,
    pub subclass_id: String,
    pub programming_interface: String,
    pub driver: Option<String>,
}

impl PciDevice {
    /// Display controllers (VGA, 3D, other)
    pub fn is_display_controller(&self) -> bool {
        self.class_id == "03"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciInfo {
    pub devices: Vec<PciDevice>,
}

impl PciInfo {
    pub fn device(&self, address: &str) -> Option<&PciDevice> {
        self.devices.iter().find(|d| d.address == address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuCard {
    pub index: u32,
    pub address: String,
    pub device: Option<PciDevice>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub cards: Vec<GpuCard>,
}
