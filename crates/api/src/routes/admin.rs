//! Back-office routes. Every handler requires the `x-admin-user` header.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/api/admin`.
///
/// ```text
/// GET    /dashboard                   -> dashboard
/// GET    /integrity                   -> integrity
/// POST   /movies/import               -> import_movie
/// POST   /movies/bulk                 -> bulk_update
/// PUT    /movies/{tmdb_id}            -> update_movie
/// POST   /movies/{tmdb_id}/enrich     -> enrich_movie
/// GET    /movies-without-ott          -> list_movies_without_ott
/// GET    /ott-diagnostics             -> diagnostics
/// POST   /ott-entry                   -> save_ott_entry
/// POST   /images/scan                 -> scan_images
/// GET    /link-health                 -> link_health
/// POST   /cache/clear                 -> clear_cache
/// POST   /validate-json               -> validate_json
/// GET    /submissions                 -> list_submissions
/// POST   /submissions/{id}            -> decide_submission
/// DELETE /submissions/{id}            -> delete_submission
/// GET    /audit-log                   -> audit_log
/// GET    /snapshots                   -> list_snapshots
/// POST   /snapshots                   -> take_snapshot
/// GET    /affiliates                  -> list_affiliates
/// POST   /affiliates                  -> save_affiliate
/// PUT    /affiliates/{id}             -> toggle_affiliate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/integrity", get(admin::integrity))
        .route("/movies/import", post(admin::import_movie))
        .route("/movies/bulk", post(admin::bulk_update))
        .route("/movies/{tmdb_id}", put(admin::update_movie))
        .route("/movies/{tmdb_id}/enrich", post(admin::enrich_movie))
        .route("/movies-without-ott", get(admin::list_movies_without_ott))
        .route("/ott-diagnostics", get(admin::diagnostics))
        .route("/ott-entry", post(admin::save_ott_entry))
        .route("/images/scan", post(admin::scan_images))
        .route("/link-health", get(admin::link_health))
        .route("/cache/clear", post(admin::clear_cache))
        .route("/validate-json", post(admin::validate_json))
        .route("/submissions", get(admin::list_submissions))
        .route(
            "/submissions/{id}",
            post(admin::decide_submission).delete(admin::delete_submission),
        )
        .route("/audit-log", get(admin::audit_log))
        .route(
            "/snapshots",
            get(admin::list_snapshots).post(admin::take_snapshot),
        )
        .route(
            "/affiliates",
            get(admin::list_affiliates).post(admin::save_affiliate),
        )
        .route("/affiliates/{id}", put(admin::toggle_affiliate))
}
