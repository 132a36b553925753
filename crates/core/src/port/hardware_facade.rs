// Hardware Facade Port
// Typed inventory queries, all resolved against one hardware root

use crate::domain::{
    BlockInfo, ChassisInfo, GpuInfo, MemoryInfo, PciInfo, ProductInfo, QueryOptions,
};
use crate::error::Result;

/// Hardware inventory port
///
/// Every query resolves `/sys` and `/proc` paths below
/// [`HardwareFacade::hardware_root`] unless `opts.chroot` says otherwise.
pub trait HardwareFacade: Send + Sync {
    fn block(&self, opts: &QueryOptions) -> Result<BlockInfo>;

    fn product(&self, opts: &QueryOptions) -> Result<ProductInfo>;

    fn gpu(&self, opts: &QueryOptions) -> Result<GpuInfo>;

    fn memory(&self, opts: &QueryOptions) -> Result<MemoryInfo>;

    fn chassis(&self, opts: &QueryOptions) -> Result<ChassisInfo>;

    fn pci(&self, opts: &QueryOptions) -> Result<PciInfo>;

    /// Alternate root supplied at construction; empty means the live root
    fn hardware_root(&self) -> &str;
}
