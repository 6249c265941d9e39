//! Execution Result Model

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Exit code reported when the interpreter could not be launched
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code reported when a command was killed by the timeout
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Captured output of one finished process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    /// Everything written to standard output
    pub stdout: String,

    /// Everything written to standard error
    pub stderr: String,

    /// Process exit status
    pub exit_code: i32,
}

impl ExecResult {
    /// Create a new result
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Synthetic failed result for an execution error
    ///
    /// Keeps block-level failures inside the block: callers record this
    /// instead of propagating the error.
    pub fn from_error(error: &Error) -> Self {
        let exit_code = match error {
            Error::CommandTimeout { .. } => TIMEOUT_EXIT_CODE,
            _ => SPAWN_FAILURE_EXIT_CODE,
        };
        Self::new(String::new(), error.to_string(), exit_code)
    }
}
