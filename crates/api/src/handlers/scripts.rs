//! Admin script endpoints: trigger a registered job, start a queued run,
//! and poll run records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ottradar_core::audit::{action_types, target_types, NewAuditEntry};
use ottradar_core::scripting::registry::ScriptJob;
use ottradar_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::record_audit;
use crate::middleware::admin::AdminUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_RECENT_RUNS: i64 = 20;
const MAX_RECENT_RUNS: i64 = 100;

#[derive(Debug, Serialize)]
pub struct ScriptInfo<'a> {
    #[serde(flatten)]
    pub job: &'a ScriptJob,
    pub heavy: bool,
}

/// GET /api/admin/scripts
pub async fn list_scripts(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> impl IntoResponse {
    let registry = state.scripts.registry();
    let jobs: Vec<ScriptInfo<'_>> = registry
        .jobs()
        .map(|job| ScriptInfo {
            heavy: registry.is_heavy(&job.name),
            job,
        })
        .collect();
    Json(DataResponse { data: jobs }).into_response()
}

/// POST /api/admin/scripts/{name}/run
///
/// Returns `202 Accepted` with the execution id at once. `queued` is true
/// when a heavy job already holds the slot; queued runs wait for an admin
/// to start them.
pub async fn run_script(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let enqueued = state.scripts.enqueue(&name, &admin.username).await?;

    let outcome = if enqueued.queued { "queued" } else { "started" };
    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::SCRIPT_RUN)
            .target(target_types::SCRIPT, enqueued.execution_id)
            .description(format!("Script '{name}' {outcome}")),
    )
    .await;

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: enqueued })))
}

/// POST /api/admin/scripts/executions/{id}/start
///
/// Start a queued run. 409 when it is not queued or the heavy slot is busy.
pub async fn start_execution(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let execution = state.scripts.start_queued(id).await?;

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::SCRIPT_RUN)
            .target(target_types::SCRIPT, id)
            .description(format!("Queued script '{}' started", execution.script_name)),
    )
    .await;

    Ok(Json(DataResponse { data: execution }))
}

/// GET /api/admin/scripts/executions/{id}
pub async fn get_execution(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let execution = state.scripts.status(id).await?;
    Ok(Json(DataResponse { data: execution }))
}

/// GET /api/admin/scripts/executions?limit=
pub async fn list_executions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_RUNS)
        .clamp(1, MAX_RECENT_RUNS);
    let runs = state.scripts.recent(limit as usize).await?;
    Ok(Json(DataResponse { data: runs }))
}
