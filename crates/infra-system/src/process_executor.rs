// Process executor - runs external commands via tokio::process
// reason: tokio for non-blocking child management, output captured in full
use async_trait::async_trait;
use std::process::{ExitStatus, Output, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

use hostcap_core::domain::{ExecutionResult, SPAWN_FAILURE_EXIT_CODE};
use hostcap_core::port::CommandExecutor;

/// Program (plus leading arguments) that privileged commands are run through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationWrapper {
    pub program: String,
    pub args: Vec<String>,
}

impl ElevationWrapper {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// No wrapper: privileged commands run exactly like unprivileged ones
    pub fn none() -> Self {
        Self::new("", Vec::new())
    }

    /// Full argv for running `command args...` through the wrapper
    fn wrap<'a>(&'a self, command: &'a str, args: &[&'a str]) -> (&'a str, Vec<&'a str>) {
        if self.program.is_empty() {
            return (command, args.to_vec());
        }
        let mut argv: Vec<&str> = self.args.iter().map(String::as_str).collect();
        argv.push(command);
        argv.extend_from_slice(args);
        (self.program.as_str(), argv)
    }
}

impl Default for ElevationWrapper {
    /// Enter the mount and IPC namespaces of the host's init process
    fn default() -> Self {
        Self::new(
            "nsenter",
            ["-t", "1", "-m", "-i", "--"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

/// Process executor
///
/// Spawns the program directly (no shell) with stdin closed and waits for it
/// to exit. No timeout is enforced.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    elevation: ElevationWrapper,
}

impl ProcessExecutor {
    /// # Example
    /// ```ignore
    /// let executor = ProcessExecutor::new(ElevationWrapper::default());
    /// let result = executor.execute("ip", &["-j", "addr"]).await;
    /// ```
    pub fn new(elevation: ElevationWrapper) -> Self {
        Self { elevation }
    }

    pub fn elevation(&self) -> &ElevationWrapper {
        &self.elevation
    }

    async fn run(&self, command: &str, args: &[&str]) -> ExecutionResult {
        debug!(command = %command, args = ?args, "Starting command");

        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(output) => {
                let result = build_result(output);
                debug!(
                    command = %command,
                    exit_code = result.exit_code,
                    "Command completed"
                );
                result
            }
            Err(e) => {
                warn!(command = %command, error = %e, "Failed to start command");
                ExecutionResult::failure(format!("failed to execute {}: {}", command, e))
            }
        }
    }
}

/// Build the result triple from process output
///
/// A failing command that wrote nothing to stderr gets its exit status
/// described there instead.
fn build_result(output: Output) -> ExecutionResult {
    let exit_code = exit_code(&output.status);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() && stderr.is_empty() {
        stderr = describe_status(&output.status);
    }

    ExecutionResult::new(stdout, stderr, exit_code)
}

fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(SPAWN_FAILURE_EXIT_CODE)
}

fn describe_status(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit status {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal: {}", signal);
        }
    }

    status.to_string()
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, command: &str, args: &[&str]) -> ExecutionResult {
        self.run(command, args).await
    }

    async fn execute_privileged(&self, command: &str, args: &[&str]) -> ExecutionResult {
        let (program, argv) = self.elevation.wrap(command, args);
        self.run(program, &argv).await
    }
}
