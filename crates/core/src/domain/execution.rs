// Execution Result - (stdout, stderr, exit code) of one external command or probe

use serde::{Deserialize, Serialize};

/// Exit code reported when a command could not be started or was killed by a signal
pub const SPAWN_FAILURE_EXIT_CODE: i32 = -1;

/// Captured outcome of running an external program to completion
///
/// Built once and never mutated. A non-zero `exit_code` is data, not an error:
/// the caller decides what it means.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Successful result carrying only standard output
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(stdout, "", 0)
    }

    /// Failure result with an empty stdout and the spawn-failure sentinel
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self::new("", stderr, SPAWN_FAILURE_EXIT_CODE)
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_uses_sentinel() {
        let result = ExecutionResult::failure("nmap: not found");
        assert_eq!(result.exit_code, SPAWN_FAILURE_EXIT_CODE);
        assert!(result.stdout.is_empty());
        assert!(!result.is_success());
    }

    #[test]
    fn test_success_keeps_trailing_newline() {
        let result = ExecutionResult::success("1.2.3.4\n");
        assert_eq!(result.stdout, "1.2.3.4\n");
        assert!(result.stderr.is_empty());
        assert!(result.is_success());
    }
}
