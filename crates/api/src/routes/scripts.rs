use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

/// Admin script routes mounted at `/api/admin/scripts`.
///
/// ```text
/// GET  /                              -> list_scripts
/// POST /{name}/run                    -> run_script
/// GET  /executions                    -> list_executions
/// GET  /executions/{id}               -> get_execution
/// POST /executions/{id}/start         -> start_execution
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scripts::list_scripts))
        .route("/{name}/run", post(scripts::run_script))
        .route("/executions", get(scripts::list_executions))
        .route("/executions/{id}", get(scripts::get_execution))
        .route("/executions/{id}/start", post(scripts::start_execution))
}
