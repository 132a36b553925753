// Dependency Abstraction Layer - the complete capability surface handed to probes

use crate::port::{CommandExecutor, FileSystem, HardwareFacade, IdentityResolver, NetworkFacade};

/// Every external effect a probe may invoke
///
/// Probes depend on this trait only; any type that implements the five
/// facades gets it automatically, so fakes need no extra wiring.
pub trait HostDependencies:
    CommandExecutor + NetworkFacade + HardwareFacade + IdentityResolver + FileSystem
{
}

impl<T> HostDependencies for T where
    T: CommandExecutor + NetworkFacade + HardwareFacade + IdentityResolver + FileSystem
{
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{
        AddressFamily, BlockInfo, ChassisInfo, DryRunConfig, ExecutionResult, FileInfo, GpuInfo,
        Link, MemoryInfo, PciInfo, ProductInfo, QueryOptions, Route, UNKNOWN,
    };
    use crate::error::{HostError, Result};
    use crate::port::command_executor::mocks::ScriptedExecutor;
    use crate::port::network_facade::mocks::FakeNetwork;
    use crate::port::NetworkInterface;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::{Component, Path, PathBuf};
    use std::sync::{Arc, Mutex};

    /// In-memory capability layer with canned data
    ///
    /// Hardware queries record the root they were resolved against so tests
    /// can check chroot propagation.
    pub struct FakeDependencies {
        pub executor: ScriptedExecutor,
        pub network: FakeNetwork,
        dry_run: DryRunConfig,
        os_hostname: String,
        hardware_root: String,
        files: HashMap<PathBuf, Vec<u8>>,
        block: BlockInfo,
        memory: MemoryInfo,
        pci: PciInfo,
        gpu: GpuInfo,
        queried_roots: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl FakeDependencies {
        pub fn new(dry_run: DryRunConfig, hardware_root: impl Into<String>) -> Self {
            Self {
                executor: ScriptedExecutor::new(),
                network: FakeNetwork::new(),
                dry_run,
                os_hostname: "fake-host".to_string(),
                hardware_root: hardware_root.into(),
                files: HashMap::new(),
                block: BlockInfo::default(),
                memory: MemoryInfo::default(),
                pci: PciInfo::default(),
                gpu: GpuInfo::default(),
                queried_roots: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_os_hostname(mut self, hostname: impl Into<String>) -> Self {
            self.os_hostname = hostname.into();
            self
        }

        pub fn with_executor(mut self, executor: ScriptedExecutor) -> Self {
            self.executor = executor;
            self
        }

        pub fn with_network(mut self, network: FakeNetwork) -> Self {
            self.network = network;
            self
        }

        pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
            self.files.insert(path.into(), contents.into());
            self
        }

        pub fn with_block(mut self, block: BlockInfo) -> Self {
            self.block = block;
            self
        }

        pub fn with_memory(mut self, memory: MemoryInfo) -> Self {
            self.memory = memory;
            self
        }

        pub fn with_pci(mut self, pci: PciInfo) -> Self {
            self.pci = pci;
            self
        }

        pub fn with_gpu(mut self, gpu: GpuInfo) -> Self {
            self.gpu = gpu;
            self
        }

        /// Roots resolved by hardware queries so far, in call order
        pub fn queried_roots(&self) -> Vec<PathBuf> {
            self.queried_roots.lock().unwrap().clone()
        }

        fn record(&self, opts: &QueryOptions) {
            let root = opts.effective_root(&self.hardware_root);
            self.queried_roots.lock().unwrap().push(root);
        }

        fn lookup(&self, path: &Path) -> Result<&Vec<u8>> {
            self.files
                .get(path)
                .ok_or_else(|| HostError::NotFound(path.display().to_string()))
        }

        fn file_info(path: &Path, size: u64, is_dir: bool) -> FileInfo {
            FileInfo {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                size,
                mode: if is_dir { 0o40755 } else { 0o100644 },
                is_dir,
                is_symlink: false,
                modified: None,
            }
        }
    }

    #[async_trait]
    impl CommandExecutor for FakeDependencies {
        async fn execute(&self, command: &str, args: &[&str]) -> ExecutionResult {
            self.executor.execute(command, args).await
        }

        async fn execute_privileged(&self, command: &str, args: &[&str]) -> ExecutionResult {
            self.executor.execute_privileged(command, args).await
        }
    }

    impl NetworkFacade for FakeDependencies {
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

    impl HardwareFacade for FakeDependencies {
        fn block(&self, opts: &QueryOptions) -> Result<BlockInfo> {
            self.record(opts);
            Ok(self.block.clone())
        }

        fn product(&self, opts: &QueryOptions) -> Result<ProductInfo> {
            self.record(opts);
            Ok(ProductInfo {
                family: UNKNOWN.to_string(),
                name: "Fake Machine".to_string(),
                vendor: "Fake Vendor".to_string(),
                serial_number: "FAKE-0001".to_string(),
                uuid: "00000000-0000-0000-0000-000000000001".to_string(),
                sku: UNKNOWN.to_string(),
                version: UNKNOWN.to_string(),
            })
        }

        fn gpu(&self, opts: &QueryOptions) -> Result<GpuInfo> {
            self.record(opts);
            Ok(self.gpu.clone())
        }

        fn memory(&self, opts: &QueryOptions) -> Result<MemoryInfo> {
            self.record(opts);
            Ok(self.memory.clone())
        }

        fn chassis(&self, opts: &QueryOptions) -> Result<ChassisInfo> {
            self.record(opts);
            Ok(ChassisInfo {
                asset_tag: UNKNOWN.to_string(),
                serial_number: UNKNOWN.to_string(),
                chassis_type: "1".to_string(),
                vendor: "Fake Vendor".to_string(),
                version: UNKNOWN.to_string(),
            })
        }

        fn pci(&self, opts: &QueryOptions) -> Result<PciInfo> {
            self.record(opts);
            Ok(self.pci.clone())
        }

        fn hardware_root(&self) -> &str {
            &self.hardware_root
        }
    }

    impl IdentityResolver for FakeDependencies {
        fn hostname(&self) -> Result<String> {
            if self.dry_run.enabled {
                return Ok(self.dry_run.forced_hostname.clone());
            }
            Ok(self.os_hostname.clone())
        }
    }

    impl FileSystem for FakeDependencies {
        fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            self.lookup(path).cloned()
        }

        fn stat(&self, path: &Path) -> Result<FileInfo> {
            if let Ok(contents) = self.lookup(path) {
                return Ok(Self::file_info(path, contents.len() as u64, false));
            }
            if self.files.keys().any(|p| p.starts_with(path)) {
                return Ok(Self::file_info(path, 0, true));
            }
            Err(HostError::NotFound(path.display().to_string()))
        }

        fn read_dir(&self, path: &Path) -> Result<Vec<FileInfo>> {
            let mut entries: Vec<FileInfo> = self
                .files
                .iter()
                .filter(|(p, _)| p.parent() == Some(path))
                .map(|(p, contents)| Self::file_info(p, contents.len() as u64, false))
                .collect();
            if entries.is_empty() {
                return Err(HostError::NotFound(path.display().to_string()));
            }
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(entries)
        }

        fn abs(&self, path: &Path) -> Result<PathBuf> {
            let mut out = PathBuf::from("/");
            for component in path.components() {
                match component {
                    Component::ParentDir => {
                        out.pop();
                    }
                    Component::Normal(c) => out.push(c),
                    _ => {}
                }
            }
            Ok(out)
        }

        fn eval_symlinks(&self, path: &Path) -> Result<PathBuf> {
            self.lookup(path)?;
            Ok(path.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::FakeDependencies;
    use super::*;
    use crate::domain::{DryRunConfig, QueryOptions};
    use std::path::{Path, PathBuf};

    fn probe_hostname(deps: &dyn HostDependencies) -> String {
        deps.hostname().unwrap()
    }

    #[test]
    fn test_dry_run_overrides_hostname() {
        let deps = FakeDependencies::new(DryRunConfig::with_hostname("forced-01"), "")
            .with_os_hostname("real-host");
        assert_eq!(probe_hostname(&deps), "forced-01");
    }

    #[test]
    fn test_dry_run_with_empty_hostname_is_permissive() {
        let deps = FakeDependencies::new(DryRunConfig::with_hostname(""), "")
            .with_os_hostname("real-host");
        assert_eq!(probe_hostname(&deps), "");
    }

    #[test]
    fn test_disabled_dry_run_reports_os_hostname() {
        let deps = FakeDependencies::new(DryRunConfig::disabled(), "").with_os_hostname("real-host");
        assert_eq!(probe_hostname(&deps), "real-host");
    }

    #[test]
    fn test_hardware_queries_share_layer_root() {
        let deps = FakeDependencies::new(DryRunConfig::disabled(), "/host");
        let opts = QueryOptions::default();
        deps.block(&opts).unwrap();
        deps.memory(&opts).unwrap();
        deps.pci(&QueryOptions::default().with_chroot("/mnt")).unwrap();

        assert_eq!(deps.hardware_root(), "/host");
        assert_eq!(
            deps.queried_roots(),
            vec![
                PathBuf::from("/host"),
                PathBuf::from("/host"),
                PathBuf::from("/mnt")
            ]
        );
    }

    #[test]
    fn test_fake_file_system() {
        let deps = FakeDependencies::new(DryRunConfig::disabled(), "")
            .with_file("/etc/hostname", "node-1\n");

        assert_eq!(deps.read_file(Path::new("/etc/hostname")).unwrap(), b"node-1\n");
        assert!(deps.stat(Path::new("/etc")).unwrap().is_dir);
        assert_eq!(deps.read_dir(Path::new("/etc")).unwrap().len(), 1);
        assert_eq!(
            deps.abs(Path::new("/etc/../var/./log")).unwrap(),
            PathBuf::from("/var/log")
        );
        assert!(deps.read_file(Path::new("/missing")).unwrap_err().is_not_found());
    }
}
