// Execution Service Port
// Runs an external program to completion and captures (stdout, stderr, exit code)

use crate::domain::ExecutionResult;
use async_trait::async_trait;

/// Command execution port
///
/// Implementations never fail: a command that cannot start still yields an
/// [`ExecutionResult`] with a non-zero exit code and a diagnostic stderr.
/// There is no timeout; a hung command blocks the caller until it exits.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` with `args` as the current user
    async fn execute(&self, command: &str, args: &[&str]) -> ExecutionResult;

    /// Run `command` with `args` through the elevation wrapper
    ///
    /// The result has the same shape as [`CommandExecutor::execute`].
    async fn execute_privileged(&self, command: &str, args: &[&str]) -> ExecutionResult;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// One call observed by [`ScriptedExecutor`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub privileged: bool,
        pub command: String,
        pub args: Vec<String>,
    }

    /// Executor answering from canned results keyed by command name
    ///
    /// Unknown commands behave like a binary missing from `PATH`.
    #[derive(Default, Clone)]
    pub struct ScriptedExecutor {
        responses: Arc<Mutex<HashMap<String, ExecutionResult>>>,
        calls: Arc<Mutex<Vec<RecordedCall>>>,
    }

    impl ScriptedExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, command: impl Into<String>, result: ExecutionResult) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(command.into(), result);
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn respond(&self, privileged: bool, command: &str, args: &[&str]) -> ExecutionResult {
            self.calls.lock().unwrap().push(RecordedCall {
                privileged,
                command: command.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            });

            self.responses
                .lock()
                .unwrap()
                .get(command)
                .cloned()
                .unwrap_or_else(|| {
                    ExecutionResult::failure(format!(
                        "exec: \"{}\": executable file not found in $PATH",
                        command
                    ))
                })
        }
    }

    #[async_trait]
    impl CommandExecutor for ScriptedExecutor {
        async fn execute(&self, command: &str, args: &[&str]) -> ExecutionResult {
            self.respond(false, command, args)
        }

        async fn execute_privileged(&self, command: &str, args: &[&str]) -> ExecutionResult {
            self.respond(true, command, args)
        }
    }
}
