use axum::extract::State;
use axum::{routing::get, Json, Router};
use ottradar_providers::ProviderStatus;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct CatalogHealth {
    /// `postgres` or `memory`.
    pub backend: &'static str,
    /// A count over the catalog succeeded.
    pub reachable: bool,
}

/// `status` is `ok` only when the database and catalog answer and TMDB is
/// configured; anything less is `degraded`. OMDb and streaming are optional.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub catalog: CatalogHealth,
    /// Which metadata providers have credentials.
    pub providers: ProviderStatus,
    pub heavy_job_running: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = ottradar_db::health_check(&state.pool).await.is_ok();
    let reachable = match state.catalog.count(&[]).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(backend = state.catalog.backend(), error = %e, "Catalog health check failed");
            false
        }
    };
    let providers = state.metadata.status();

    let healthy = database && reachable && providers.tmdb;
    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        catalog: CatalogHealth {
            backend: state.catalog.backend(),
            reachable,
        },
        providers,
        heavy_job_running: state.scripts.heavy_slot_busy(),
    })
}

/// Mount health check routes (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
