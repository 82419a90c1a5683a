//! Script execution interface and shared types.
//!
//! Defines [`ScriptExecutor`], the seam between the queue and the process
//! runner, along with [`ScriptInput`], [`ScriptOutput`], and [`ScriptError`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::registry::ScriptJob;

/// Per-run settings handed to an executor.
#[derive(Debug, Clone)]
pub struct ScriptInput {
    /// Additional environment variables set for the child process.
    pub env_vars: Vec<(String, String)>,
    /// Working directory for the child process (uses current dir if `None`).
    pub working_directory: Option<String>,
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
}

/// Captured output from a finished process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ScriptOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors that can occur while running a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The job has no program to run.
    #[error("Script has an empty command line: {0}")]
    EmptyCommand(String),

    /// The process could not be started.
    #[error("Failed to start script: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process exceeded its timeout and was killed.
    #[error("Script timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Waiting on the process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs one registered job to completion.
pub trait ScriptExecutor: Send + Sync + 'static {
    fn execute(
        &self,
        job: &ScriptJob,
        input: ScriptInput,
    ) -> impl std::future::Future<Output = Result<ScriptOutput, ScriptError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
