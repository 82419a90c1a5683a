//! `script_executions` rows.

use ottradar_core::scripting::status::{ExecutionStatus, ScriptExecution};
use ottradar_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ScriptExecutionRow {
    pub id: DbId,
    pub script_name: String,
    pub triggered_by: String,
    pub status: String,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub duration_seconds: Option<i64>,
    pub exit_code: Option<i32>,
    pub output_log: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
}

impl From<ScriptExecutionRow> for ScriptExecution {
    fn from(row: ScriptExecutionRow) -> Self {
        // The CHECK constraint limits status to known values.
        let status = ExecutionStatus::parse(&row.status).unwrap_or(ExecutionStatus::Failed);
        ScriptExecution {
            id: row.id,
            script_name: row.script_name,
            triggered_by: row.triggered_by,
            status,
            started_at: row.started_at,
            completed_at: row.completed_at,
            duration_seconds: row.duration_seconds,
            exit_code: row.exit_code,
            output_log: row.output_log,
            error_message: row.error_message,
            created_at: row.created_at,
        }
    }
}
