//! Execution status and the `script_executions` record types.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Lifecycle of one script run.
///
/// `queued` and `running` are live states; `success` and `failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Queued,
    Running,
    Success,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// A persisted script run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptExecution {
    pub id: DbId,
    pub script_name: String,
    /// Admin identity that requested the run.
    pub triggered_by: String,
    pub status: ExecutionStatus,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub duration_seconds: Option<i64>,
    pub exit_code: Option<i32>,
    /// Captured stdout, truncated.
    pub output_log: Option<String>,
    /// Captured stderr or failure reason, truncated.
    pub error_message: Option<String>,
    pub created_at: Timestamp,
}

/// Insert DTO for a new run.
#[derive(Debug, Clone)]
pub struct NewExecution {
    pub script_name: String,
    pub triggered_by: String,
    pub status: ExecutionStatus,
}

/// Terminal outcome written by the worker task.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub exit_code: Option<i32>,
    pub output_log: Option<String>,
    pub error_message: Option<String>,
    pub duration_seconds: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
