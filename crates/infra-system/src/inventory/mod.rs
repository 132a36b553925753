// Hardware inventory - sysfs/procfs readers rooted at a configurable chroot
// reason: every query must resolve paths below the hardware root, so the
// inventory reads the kernel interfaces directly

mod block;
mod dmi;
mod memory;
mod pci;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use hostcap_core::domain::{
    BlockInfo, ChassisInfo, GpuInfo, MemoryInfo, PciInfo, ProductInfo, QueryOptions, UNKNOWN,
};
use hostcap_core::error::{HostError, Result};
use hostcap_core::port::HardwareFacade;

/// Reads kernel attribute files relative to one root
pub(crate) struct SysfsReader {
    root: PathBuf,
    warnings: bool,
}

impl SysfsReader {
    pub(crate) fn new(root: PathBuf, opts: &QueryOptions) -> Self {
        Self {
            root,
            warnings: !opts.disable_warnings,
        }
    }

    /// `relative` re-rooted below the reader's root
    pub(crate) fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        let relative = relative.strip_prefix("/").unwrap_or(relative);
        self.root.join(relative)
    }

    /// Trimmed attribute contents, `None` if absent or unreadable
    pub(crate) fn attr(&self, relative: impl AsRef<Path>) -> Option<String> {
        fs::read_to_string(self.path(relative))
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Attribute contents or [`UNKNOWN`], warning when missing
    pub(crate) fn attr_or_unknown(&self, relative: impl AsRef<Path>) -> String {
        let relative = relative.as_ref();
        match self.attr(relative) {
            Some(value) if !value.is_empty() => value,
            _ => {
                self.warn(&format!("unable to read {}", relative.display()));
                UNKNOWN.to_string()
            }
        }
    }

    pub(crate) fn attr_u64(&self, relative: impl AsRef<Path>) -> Option<u64> {
        self.attr(relative).and_then(|v| v.parse().ok())
    }

    pub(crate) fn attr_is_one(&self, relative: impl AsRef<Path>) -> bool {
        self.attr(relative).as_deref() == Some("1")
    }

    /// Sorted entry names of a directory
    pub(crate) fn list(&self, relative: impl AsRef<Path>) -> Result<Vec<String>> {
        let dir = self.path(relative);
        let entries = fs::read_dir(&dir).map_err(|e| HostError::from_io(dir.display(), e))?;
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Final component of a symlink target (e.g. a bound driver name)
    pub(crate) fn link_name(&self, relative: impl AsRef<Path>) -> Option<String> {
        fs::read_link(self.path(relative))
            .ok()
            .and_then(|t| t.file_name().map(|n| n.to_string_lossy().into_owned()))
    }

    pub(crate) fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }

    pub(crate) fn warn(&self, message: &str) {
        if self.warnings {
            warn!(root = %self.root.display(), "{}", message);
        }
    }
}

/// Hardware facade over sysfs/procfs
///
/// # Example
/// ```ignore
/// let inventory = SysfsInventory::new("/host");
/// let disks = inventory.block(&QueryOptions::default())?; // reads /host/sys/block
/// ```
#[derive(Debug, Clone, Default)]
pub struct SysfsInventory {
    hardware_root: String,
}

impl SysfsInventory {
    pub fn new(hardware_root: impl Into<String>) -> Self {
        Self {
            hardware_root: hardware_root.into(),
        }
    }

    fn reader(&self, opts: &QueryOptions, domain: &str) -> SysfsReader {
        let root = opts.effective_root(&self.hardware_root);
        debug!(domain = %domain, root = %root.display(), "Hardware query");
        SysfsReader::new(root, opts)
    }
}

impl HardwareFacade for SysfsInventory {
    fn block(&self, opts: &QueryOptions) -> Result<BlockInfo> {
        block::collect(&self.reader(opts, "block"))
    }

    fn product(&self, opts: &QueryOptions) -> Result<ProductInfo> {
        Ok(dmi::product(&self.reader(opts, "product")))
    }

    fn gpu(&self, opts: &QueryOptions) -> Result<GpuInfo> {
        pci::gpus(&self.reader(opts, "gpu"))
    }

    fn memory(&self, opts: &QueryOptions) -> Result<MemoryInfo> {
        memory::collect(&self.reader(opts, "memory"))
    }

    fn chassis(&self, opts: &QueryOptions) -> Result<ChassisInfo> {
        Ok(dmi::chassis(&self.reader(opts, "chassis")))
    }

    fn pci(&self, opts: &QueryOptions) -> Result<PciInfo> {
        pci::collect(&self.reader(opts, "pci"))
    }

    fn hardware_root(&self) -> &str {
        &self.hardware_root
    }
}

/// Fixture helpers shared by the inventory tests
#[cfg(test)]
pub(crate) mod fixture {
    use std::fs;
    use std::path::Path;

    pub(crate) fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub(crate) fn link(root: &Path, relative: &str, target: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(target, path).unwrap();
    }
}
