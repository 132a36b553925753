//! Probe entry point: argument-count check and verbatim result relay

use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, warn, Instrument, Span};

use hostcap_core::domain::ExecutionResult;
use hostcap_core::port::{CommandExecutor, Probe};

/// Process status for a wrong positional argument count (EX_USAGE)
///
/// Distinct from the probe's own codes (0, nmap's codes, 255 for the -1 sentinel).
pub const USAGE_EXIT_CODE: i32 = 64;

const PROGRAM: &str = "free_addresses";

/// Run `probe` on the single target and relay its result
///
/// Returns the process status to exit with. Nothing is written to `stdout`
/// or `stderr` on a usage error, and the probe is not invoked. The probe runs
/// inside `log`, so every event it causes is recorded under that span.
pub async fn run_probe<P, O, E>(
    targets: &[String],
    probe: &P,
    executor: &dyn CommandExecutor,
    log: &Span,
    stdout: &mut O,
    stderr: &mut E,
) -> io::Result<i32>
where
    P: Probe + ?Sized,
    O: Write,
    E: Write,
{
    let [target] = targets else {
        warn!(
            parent: log,
            "Expecting exactly single argument to {}. Received {}",
            PROGRAM,
            targets.len()
        );
        return Ok(USAGE_EXIT_CODE);
    };

    // Entered for the whole run so adapter events inherit the host id
    let result = probe
        .run(target, executor, log)
        .instrument(log.clone())
        .await;
    debug!(parent: log, exit_code = result.exit_code, "Probe finished");

    relay(&result, stdout, stderr)?;
    Ok(result.exit_code)
}

/// Write the result streams untouched
pub fn relay<O: Write, E: Write>(
    result: &ExecutionResult,
    stdout: &mut O,
    stderr: &mut E,
) -> io::Result<()> {
    stdout.write_all(result.stdout.as_bytes())?;
    stdout.flush()?;
    stderr.write_all(result.stderr.as_bytes())?;
    stderr.flush()
}

/// Status truncated to the low byte, as the OS does
pub fn exit_status(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}
