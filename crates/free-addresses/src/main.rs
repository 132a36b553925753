//! free_addresses - Main Entry Point

use anyhow::Result;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::info;

use hostcap_free_addresses::{config::SubprocessArgs, exit_status, logging, run_probe};
use hostcap_infra_system::SystemDependencies;
use hostcap_probe_free_addresses::FreeAddressesProbe;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // 1. Load configuration
    let args = SubprocessArgs::parse();

    // 2. Initialize logging (file sink by default, never stdout)
    let _logging = logging::init(&args.logging)?;
    let span = logging::root_span(args.dry_run.forced_host_id.as_deref());
    info!(parent: &span, "free_addresses v{} starting", VERSION);
    args.dry_run.warn_if_incomplete(&span);

    // 3. Build the capability layer (no system access until a call is made)
    let deps = SystemDependencies::new(args.dry_run.to_config(), args.hardware_root.clone());

    // 4. Run exactly one probe and relay its result
    let probe = FreeAddressesProbe::new();
    let code = run_probe(
        &args.targets,
        &probe,
        &deps,
        &span,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await?;

    Ok(exit_status(code))
}
