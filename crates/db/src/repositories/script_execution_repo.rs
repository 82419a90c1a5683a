//! Repository for the `script_executions` table.

use ottradar_core::scripting::status::{ExecutionResult, ExecutionStatus, NewExecution};
use ottradar_core::types::DbId;
use sqlx::PgPool;

use crate::models::script_execution::ScriptExecutionRow;

const COLUMNS: &str = "\
    id, script_name, triggered_by, status, started_at, completed_at, \
    duration_seconds, exit_code, output_log, error_message, created_at";

pub struct ScriptExecutionRepo;

impl ScriptExecutionRepo {
    pub async fn create(
        pool: &PgPool,
        execution: &NewExecution,
    ) -> Result<ScriptExecutionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO script_executions (script_name, triggered_by, status) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScriptExecutionRow>(&query)
            .bind(&execution.script_name)
            .bind(&execution.triggered_by)
            .bind(execution.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Move to `running` and stamp `started_at`. Returns false when the row is missing.
    pub async fn mark_running(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE script_executions SET status = $2, started_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(ExecutionStatus::Running.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the terminal outcome and stamp `completed_at`.
    pub async fn finish(
        pool: &PgPool,
        id: DbId,
        result: &ExecutionResult,
    ) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE script_executions SET \
                status = $2, exit_code = $3, output_log = $4, error_message = $5, \
                duration_seconds = $6, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(result.status.as_str())
        .bind(result.exit_code)
        .bind(&result.output_log)
        .bind(&result.error_message)
        .bind(result.duration_seconds)
        .execute(pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ScriptExecutionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM script_executions WHERE id = $1");
        sqlx::query_as::<_, ScriptExecutionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ScriptExecutionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM script_executions ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, ScriptExecutionRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
