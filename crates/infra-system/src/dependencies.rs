// SystemDependencies - production implementation of the capability layer
// Composition only: construction stores its inputs, every effect happens per call
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use hostcap_core::domain::{
    AddressFamily, BlockInfo, ChassisInfo, DryRunConfig, ExecutionResult, FileInfo, GpuInfo,
    Link, MemoryInfo, PciInfo, ProductInfo, QueryOptions, Route,
};
use hostcap_core::error::Result;
use hostcap_core::port::{
    CommandExecutor, FileSystem, HardwareFacade, IdentityResolver, NetworkFacade,
    NetworkInterface,
};

use crate::file_system::OsFileSystem;
use crate::identity::HostIdentity;
use crate::inventory::SysfsInventory;
use crate::network::SystemNetwork;
use crate::process_executor::{ElevationWrapper, ProcessExecutor};

/// The capability layer backed by the real OS
///
/// Immutable after construction and free of caches, so a shared reference
/// can be used from several tasks at once.
///
/// # Example
/// ```ignore
/// let deps = SystemDependencies::new(DryRunConfig::disabled(), "");
/// let hostname = deps.hostname()?;
/// ```
#[derive(Debug, Clone)]
pub struct SystemDependencies {
    executor: ProcessExecutor,
    network: SystemNetwork,
    inventory: SysfsInventory,
    identity: HostIdentity,
    files: OsFileSystem,
}

impl SystemDependencies {
    /// # Arguments
    /// * `dry_run` - Simulation settings (only hostname resolution is substituted)
    /// * `hardware_root` - Alternate root for hardware queries, empty for `/`
    pub fn new(dry_run: DryRunConfig, hardware_root: impl Into<String>) -> Self {
        Self {
            executor: ProcessExecutor::new(ElevationWrapper::default()),
            network: SystemNetwork::new(),
            inventory: SysfsInventory::new(hardware_root),
            identity: HostIdentity::new(dry_run),
            files: OsFileSystem::new(),
        }
    }

    /// Replace the wrapper privileged commands are run through
    pub fn with_elevation(mut self, elevation: ElevationWrapper) -> Self {
        self.executor = ProcessExecutor::new(elevation);
        self
    }

    /// Replace the network facade (alternate proc/sys mounts)
    pub fn with_network(mut self, network: SystemNetwork) -> Self {
        self.network = network;
        self
    }

    pub fn dry_run(&self) -> &DryRunConfig {
        self.identity.dry_run()
    }
}

#[async_trait]
impl CommandExecutor for SystemDependencies {
    async fn execute(&self, command: &str, args: &[&str]) -> ExecutionResult {
        self.executor.execute(command, args).await
    }

    async fn execute_privileged(&self, command: &str, args: &[&str]) -> ExecutionResult {
        self.executor.execute_privileged(command, args).await
    }
}

impl NetworkFacade for SystemDependencies {
    fn interfaces(&self) -> Result<Vec<NetworkInterface<'_>>> {
        self.network.interfaces()
    }

    fn link_by_name(&self, name: &str) -> Result<Link> {
        self.network.link_by_name(name)
    }

    fn route_list(&self, link: &Link, family: AddressFamily) -> Result<Vec<Route>> {
        self.network.route_list(link, family)
    }
}

impl HardwareFacade for SystemDependencies {
    fn block(&self, opts: &QueryOptions) -> Result<BlockInfo> {
        self.inventory.block(opts)
    }

    fn product(&self, opts: &QueryOptions) -> Result<ProductInfo> {
        self.inventory.product(opts)
    }

    fn gpu(&self, opts: &QueryOptions) -> Result<GpuInfo> {
        self.inventory.gpu(opts)
    }

    fn memory(&self, opts: &QueryOptions) -> Result<MemoryInfo> {
        self.inventory.memory(opts)
    }

    fn chassis(&self, opts: &QueryOptions) -> Result<ChassisInfo> {
        self.inventory.chassis(opts)
    }

    fn pci(&self, opts: &QueryOptions) -> Result<PciInfo> {
        self.inventory.pci(opts)
    }

    fn hardware_root(&self) -> &str {
        self.inventory.hardware_root()
    }
}

impl IdentityResolver for SystemDependencies {
    fn hostname(&self) -> Result<String> {
        self.identity.hostname()
    }
}

impl FileSystem for SystemDependencies {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.read_file(path)
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        self.files.stat(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<FileInfo>> {
        self.files.read_dir(path)
    }

    fn abs(&self, path: &Path) -> Result<PathBuf> {
        self.files.abs(path)
    }

    fn eval_symlinks(&self, path: &Path) -> Result<PathBuf> {
        self.files.eval_symlinks(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcap_core::port::HostDependencies;

    fn as_capabilities(deps: &SystemDependencies) -> &dyn HostDependencies {
        deps
    }

    #[test]
    fn test_construction_stores_inputs_only() {
        let deps = SystemDependencies::new(
            DryRunConfig::with_hostname("dry-host"),
            "/nonexistent/hostcap-root",
        );

        assert_eq!(deps.hardware_root(), "/nonexistent/hostcap-root");
        assert!(deps.dry_run().enabled);
        // The bogus root only fails once a query is actually issued
        assert!(deps.block(&QueryOptions::default()).is_err());
    }

    #[test]
    fn test_dry_run_only_substitutes_hostname() {
        let deps = SystemDependencies::new(DryRunConfig::with_hostname("dry-host"), "");
        let caps = as_capabilities(&deps);

        assert_eq!(caps.hostname().unwrap(), "dry-host");
        assert!(caps.link_by_name("lo").is_ok());
        assert!(caps.stat(Path::new("/")).unwrap().is_dir);
    }

    #[tokio::test]
    async fn test_execute_through_layer() {
        let deps = SystemDependencies::new(DryRunConfig::disabled(), "")
            .with_elevation(ElevationWrapper::none());

        let plain = deps.execute("sh", &["-c", "printf out; exit 2"]).await;
        let privileged = deps
            .execute_privileged("sh", &["-c", "printf out; exit 2"])
            .await;

        assert_eq!(plain, ExecutionResult::new("out", "exit status 2", 2));
        assert_eq!(plain, privileged);
    }
}
