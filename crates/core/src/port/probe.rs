// Probe Port - contract between the entry point and a diagnostic routine

use crate::domain::ExecutionResult;
use crate::port::CommandExecutor;
use async_trait::async_trait;
use tracing::Span;

/// A diagnostic routine driven by a single target string
///
/// The returned triple is relayed verbatim by the caller: stdout to stdout,
/// stderr to stderr, exit code as the process status.
#[async_trait]
pub trait Probe: Send + Sync {
    /// # Arguments
    /// * `target` - Probe-specific target (e.g. a JSON list of CIDRs)
    /// * `executor` - Execution methods of the capability layer
    /// * `log` - Span the probe records its events under
    async fn run(
        &self,
        target: &str,
        executor: &dyn CommandExecutor,
        log: &Span,
    ) -> ExecutionResult;
}
