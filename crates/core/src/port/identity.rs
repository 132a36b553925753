// Identity Resolver Port

use crate::error::Result;

/// Resolves the machine's identity
pub trait IdentityResolver: Send + Sync {
    /// Hostname of the machine, or the forced hostname when dry-run is enabled
    fn hostname(&self) -> Result<String>;
}
