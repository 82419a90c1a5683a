//! Back-office handlers: dashboard, data quality, movie maintenance,
//! submissions, audit log, snapshots and affiliate configs.
//!
//! Every endpoint requires an [`AdminUser`]; mutations are audited.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ottradar_core::audit::{action_types, target_types, AuditEntry, NewAuditEntry};
use ottradar_core::discovery::PlatformStats;
use ottradar_core::error::CoreError;
use ottradar_core::filter::{MovieQuery, Predicate};
use ottradar_core::metrics::{
    dead_link_count, integrity_report, movies_without_ott, ott_diagnostics, platform_distribution,
    DailySnapshot,
};
use ottradar_core::movie::Movie;
use ottradar_core::scripting::status::ScriptExecution;
use ottradar_core::submission::{transition, SubmissionAction, SubmissionStatus, UserSubmission};
use ottradar_core::types::{today, DbId};
use ottradar_core::validation::{
    apply_ott_entry, validate_movie_input, validate_ott_json, MovieInput, OttEntry,
};
use ottradar_db::models::affiliate::AffiliateConfigInput;
use ottradar_db::models::audit::AuditQuery;
use ottradar_db::models::link_health::NewLinkHealthCheck;
use ottradar_db::models::submission::SubmissionCounts;
use ottradar_db::repositories::{
    AffiliateRepo, AuditRepo, LinkHealthRepo, SnapshotRepo, SubmissionRepo,
};
use ottradar_providers::enrichment::refresh_platforms;
use ottradar_providers::images::{PosterCheck, DEFAULT_IMAGE_SCAN_LIMIT};
use ottradar_providers::import::import_by_tmdb_id;
use ottradar_providers::enrich_movie_metadata;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::admin::AdminUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Script runs listed on the dashboard.
const DASHBOARD_RECENT_RUNS: usize = 5;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

async fn all_movies(state: &AppState) -> AppResult<Vec<Movie>> {
    Ok(state.catalog.query(&MovieQuery::default()).await?)
}

async fn movie_by_tmdb_id(state: &AppState, tmdb_id: i64) -> AppResult<Movie> {
    state
        .catalog
        .find_by_tmdb_id(tmdb_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Movie",
                id: tmdb_id,
            }
            .into()
        })
}

// ---------------------------------------------------------------------------
// Dashboard and integrity
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PlatformCount {
    pub platform: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_movies: u64,
    pub active_movies: u64,
    pub stats: PlatformStats,
    pub platform_distribution: Vec<PlatformCount>,
    pub dead_links: u64,
    pub submissions: SubmissionCounts,
    pub recent_runs: Vec<ScriptExecution>,
    pub heavy_job_running: bool,
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let movies = all_movies(&state).await?;
    let active_movies = state.catalog.count(&[Predicate::Active]).await?;
    let stats = state.discovery.platform_stats().await?;
    let submissions = SubmissionRepo::counts(&state.pool).await?;
    let recent_runs = state.scripts.recent(DASHBOARD_RECENT_RUNS).await?;

    Ok(Json(DataResponse {
        data: Dashboard {
            total_movies: movies.len() as u64,
            active_movies,
            stats,
            platform_distribution: platform_distribution(&movies)
                .into_iter()
                .map(|(platform, count)| PlatformCount { platform, count })
                .collect(),
            dead_links: dead_link_count(&movies),
            submissions,
            recent_runs,
            heavy_job_running: state.scripts.heavy_slot_busy(),
        },
    }))
}

/// GET /api/admin/integrity
///
/// Missing/available counts for every tracked metadata field.
pub async fn integrity(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let movies = all_movies(&state).await?;
    Ok(Json(DataResponse {
        data: integrity_report(&movies),
    }))
}

// ---------------------------------------------------------------------------
// Movie maintenance
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct EnrichResult {
    pub applied: Vec<&'static str>,
    pub movie: Movie,
}

/// POST /api/admin/movies/{tmdb_id}/enrich
///
/// Re-query every provider and store whatever they return.
pub async fn enrich_movie(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(tmdb_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut movie = movie_by_tmdb_id(&state, tmdb_id).await?;

    let enriched = enrich_movie_metadata(state.metadata.as_ref(), tmdb_id).await;
    let applied = enriched.apply_to(&mut movie);
    if applied.is_empty() {
        return Ok(Json(DataResponse {
            data: EnrichResult { applied, movie },
        }));
    }

    let movie = state.catalog.update(&movie).await?;
    let changes = serde_json::to_value(&enriched).unwrap_or_default();
    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::MOVIE_ENRICH)
            .target(target_types::MOVIE, movie.id)
            .description(format!("Enriched '{}' ({} fields)", movie.title, applied.len()))
            .changes(&changes),
    )
    .await;

    Ok(Json(DataResponse {
        data: EnrichResult { applied, movie },
    }))
}

/// PUT /api/admin/movies/{tmdb_id}
///
/// Apply the edit form. Every problem found is reported at once.
pub async fn update_movie(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(tmdb_id): Path<i64>,
    Json(input): Json<MovieInput>,
) -> AppResult<impl IntoResponse> {
    let errors = validate_movie_input(&input);
    if !errors.is_empty() {
        return Err(CoreError::Validation(errors.join("; ")).into());
    }

    let mut movie = movie_by_tmdb_id(&state, tmdb_id).await?;
    let changes = serde_json::to_value(&input)
        .map_err(|e| CoreError::Internal(format!("Failed to encode changes: {e}")))?;

    input.into_update().apply_to(&mut movie);
    let movie = state.catalog.update(&movie).await?;

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::MOVIE_EDIT)
            .target(target_types::MOVIE, movie.id)
            .description(format!("Edited '{}'", movie.title))
            .changes(&changes),
    )
    .await;

    Ok(Json(DataResponse { data: movie }))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Activate,
    Deactivate,
    Delete,
    /// Re-query the providers for each movie's platform map.
    RefreshOtt,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub ids: Vec<DbId>,
    pub action: BulkAction,
}

#[derive(Debug, Serialize)]
pub struct BulkResult {
    pub affected: u64,
}

/// POST /api/admin/movies/bulk
pub async fn bulk_update(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<BulkRequest>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(CoreError::Validation("No movies selected".into()).into());
    }

    let (affected, action_type) = match input.action {
        BulkAction::Activate => (
            state.catalog.set_active(&input.ids, true).await?,
            action_types::BULK_UPDATE,
        ),
        BulkAction::Deactivate => (
            state.catalog.set_active(&input.ids, false).await?,
            action_types::BULK_UPDATE,
        ),
        BulkAction::Delete => (
            state.catalog.delete(&input.ids).await?,
            action_types::BULK_DELETE,
        ),
        BulkAction::RefreshOtt => (
            refresh_platforms(state.metadata.as_ref(), state.catalog.as_ref(), &input.ids).await?,
            action_types::OTT_REFRESH,
        ),
    };

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_type)
            .description(format!("{:?} {affected} movies", input.action))
            .changes(&serde_json::json!({ "ids": input.ids })),
    )
    .await;

    Ok(Json(DataResponse {
        data: BulkResult { affected },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub tmdb_id: i64,
}

/// POST /api/admin/movies/import
///
/// Catalogued ids answer 200 with the stored movie; new ones are fetched
/// from TMDB, stored hidden, and answer 201.
pub async fn import_movie(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    if input.tmdb_id <= 0 {
        return Err(CoreError::Validation("TMDB ID is required".into()).into());
    }

    let outcome =
        import_by_tmdb_id(state.metadata.as_ref(), state.catalog.as_ref(), input.tmdb_id).await?;
    if !outcome.created {
        return Ok((StatusCode::OK, Json(DataResponse { data: outcome })));
    }

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::MOVIE_IMPORT)
            .target(target_types::MOVIE, outcome.movie.id)
            .description(format!(
                "Imported '{}' (TMDB {})",
                outcome.movie.title, outcome.movie.tmdb_id
            )),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

// ---------------------------------------------------------------------------
// OTT gaps
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MissingOtt {
    pub id: DbId,
    pub tmdb_id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub language: String,
    pub is_active: bool,
}

/// GET /api/admin/movies-without-ott
pub async fn list_movies_without_ott(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let movies = all_movies(&state).await?;
    let missing: Vec<MissingOtt> = movies_without_ott(&movies)
        .into_iter()
        .map(|m| MissingOtt {
            id: m.id,
            tmdb_id: m.tmdb_id,
            title: m.title.clone(),
            release_date: m.release_date.clone(),
            language: m.language.clone(),
            is_active: m.is_active,
        })
        .collect();
    Ok(Json(DataResponse { data: missing }))
}

/// GET /api/admin/ott-diagnostics
pub async fn diagnostics(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let movies = all_movies(&state).await?;
    Ok(Json(DataResponse {
        data: ott_diagnostics(&movies),
    }))
}

#[derive(Debug, Deserialize)]
pub struct OttEntryRequest {
    pub movie_id: DbId,
    #[serde(flatten)]
    pub entry: OttEntry,
}

/// POST /api/admin/ott-entry
///
/// Save a platform link and/or OTT release date found by hand.
pub async fn save_ott_entry(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<OttEntryRequest>,
) -> AppResult<impl IntoResponse> {
    let mut movie = state
        .catalog
        .find_by_id(input.movie_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Movie",
            id: input.movie_id,
        })?;

    let changed = apply_ott_entry(&mut movie, &input.entry, chrono::Utc::now())?;
    let movie = state.catalog.update(&movie).await?;

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::OTT_ENTRY)
            .target(target_types::MOVIE, movie.id)
            .description(format!("Saved {} for '{}'", changed.join(" and "), movie.title))
            .changes(&serde_json::json!(input.entry)),
    )
    .await;

    Ok(Json(DataResponse { data: movie }))
}

// ---------------------------------------------------------------------------
// Images and link health
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ImageScanParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ImageScan {
    pub checked: usize,
    pub broken: Vec<PosterCheck>,
}

/// Platform name recorded for poster checks.
const POSTER_LINK: &str = "poster";

/// Largest scan a single request may ask for.
const MAX_IMAGE_SCAN_LIMIT: usize = 1000;

/// POST /api/admin/images/scan?limit=
///
/// `HEAD` the posters of active movies and report the 404s. Every check is
/// kept in the link-health history.
pub async fn scan_images(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(params): Query<ImageScanParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_IMAGE_SCAN_LIMIT)
        .clamp(1, MAX_IMAGE_SCAN_LIMIT);
    let checks = state
        .metadata
        .poster_checker()
        .scan(state.catalog.as_ref(), limit)
        .await?;

    let history: Vec<NewLinkHealthCheck> = checks
        .iter()
        .map(|c| NewLinkHealthCheck {
            movie_id: c.movie_id,
            platform_name: POSTER_LINK.to_string(),
            url: c.url.clone(),
            status_code: c.status_code.map(i32::from),
            is_healthy: c.is_alive(),
            error_message: c.error.clone(),
            checked_at: c.checked_at,
        })
        .collect();
    if let Err(e) = LinkHealthRepo::record(&state.pool, &history).await {
        tracing::warn!(checks = history.len(), error = %e, "Failed to record poster checks");
    }

    let checked = checks.len();
    let broken: Vec<PosterCheck> = checks.into_iter().filter(PosterCheck::is_broken).collect();

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::IMAGE_SCAN)
            .description(format!("Checked {checked} posters, {} broken", broken.len())),
    )
    .await;

    Ok(Json(DataResponse {
        data: ImageScan { checked, broken },
    }))
}

#[derive(Debug, Deserialize)]
pub struct LinkHealthParams {
    #[serde(default)]
    pub unhealthy: bool,
    pub limit: Option<i64>,
}

/// GET /api/admin/link-health?unhealthy=&limit=
pub async fn link_health(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<LinkHealthParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let rows = LinkHealthRepo::list_recent(&state.pool, params.unhealthy, limit).await?;
    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CacheCleared {
    pub cleared: bool,
}

/// POST /api/admin/cache/clear
///
/// Drop the cached homepage so the next visit rebuilds it.
pub async fn clear_cache(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Json<DataResponse<CacheCleared>> {
    state.homepage_cache.invalidate_all();
    tracing::info!(admin = %admin.username, "Application cache cleared");

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::CACHE_CLEAR)
            .description("Cleared the homepage cache"),
    )
    .await;

    Json(DataResponse {
        data: CacheCleared { cleared: true },
    })
}

#[derive(Debug, Deserialize)]
pub struct ValidateJsonRequest {
    pub ott_platforms: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateJsonResult {
    pub valid: bool,
    pub error: Option<String>,
}

/// POST /api/admin/validate-json
///
/// Live check of the platform JSON typed into the edit form.
pub async fn validate_json(
    _admin: AdminUser,
    Json(input): Json<ValidateJsonRequest>,
) -> Json<DataResponse<ValidateJsonResult>> {
    let result = match validate_ott_json(&input.ott_platforms) {
        Ok(()) => ValidateJsonResult {
            valid: true,
            error: None,
        },
        Err(message) => ValidateJsonResult {
            valid: false,
            error: Some(message),
        },
    };
    Json(DataResponse { data: result })
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SubmissionListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/admin/submissions?status=&limit=&offset=
pub async fn list_submissions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<SubmissionListParams>,
) -> AppResult<impl IntoResponse> {
    let status = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            SubmissionStatus::parse(raw)
                .ok_or_else(|| AppError::InvalidQuery(format!("Unknown status '{raw}'")))?,
        ),
        None => None,
    };
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let items: Vec<UserSubmission> = SubmissionRepo::list(&state.pool, status, limit, offset)
        .await?
        .into_iter()
        .map(UserSubmission::from)
        .collect();
    Ok(Json(DataResponse { data: items }))
}

#[derive(Debug, Deserialize)]
pub struct DecideSubmission {
    pub action: SubmissionAction,
}

/// POST /api/admin/submissions/{id}
///
/// Approve or reject a pending submission.
pub async fn decide_submission(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
    Json(input): Json<DecideSubmission>,
) -> AppResult<impl IntoResponse> {
    let not_found = || CoreError::NotFound {
        entity: "Submission",
        id,
    };
    let current = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .map(UserSubmission::from)
        .ok_or_else(not_found)?;

    let next = transition(current.status, input.action)?;
    let updated = SubmissionRepo::set_status(&state.pool, id, next)
        .await?
        .map(UserSubmission::from)
        .ok_or_else(not_found)?;

    let action_type = match input.action {
        SubmissionAction::Approve => action_types::SUBMISSION_APPROVE,
        SubmissionAction::Reject => action_types::SUBMISSION_REJECT,
    };
    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_type)
            .target(target_types::SUBMISSION, id)
            .description(format!("'{}' marked {}", updated.movie_title, next.as_str())),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/admin/submissions/{id}
pub async fn delete_submission(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SubmissionRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Submission",
            id,
        }
        .into());
    }

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::SUBMISSION_DELETE)
            .target(target_types::SUBMISSION, id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

/// GET /api/admin/audit-log?action_type=&admin_username=&limit=&offset=
pub async fn audit_log(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let entries: Vec<AuditEntry> = AuditRepo::list(&state.pool, &params)
        .await?
        .into_iter()
        .map(AuditEntry::from)
        .collect();
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// POST /api/admin/snapshots
///
/// Record today's platform rollup; a second call the same day overwrites it.
pub async fn take_snapshot(
    State(state): State<AppState>,
    admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let movies = all_movies(&state).await?;
    let snapshot = DailySnapshot::from_movies(today(), &movies);
    let row = SnapshotRepo::upsert(&state.pool, &snapshot).await?;
    tracing::info!(date = %row.snapshot_date, total = row.total_count, "Platform snapshot recorded");

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::SNAPSHOT)
            .target(target_types::SNAPSHOT, row.id)
            .description(format!("Snapshot for {}", row.snapshot_date)),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// GET /api/admin/snapshots?limit=
pub async fn list_snapshots(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(30).clamp(1, 365);
    let rows = SnapshotRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// Affiliate configs
// ---------------------------------------------------------------------------

/// GET /api/admin/affiliates
pub async fn list_affiliates(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let configs = AffiliateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: configs }))
}

#[derive(Debug, Deserialize)]
pub struct ToggleAffiliate {
    pub is_active: bool,
}

/// POST /api/admin/affiliates
///
/// Create or replace the settings for one platform.
pub async fn save_affiliate(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<AffiliateConfigInput>,
) -> AppResult<impl IntoResponse> {
    if input.platform_name.trim().is_empty() {
        return Err(CoreError::Validation("Platform name is required".into()).into());
    }
    if !input.tracking_params.is_object() {
        return Err(CoreError::Validation("Tracking params must be a JSON object".into()).into());
    }

    let config = AffiliateRepo::upsert(&state.pool, &input).await?;
    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::AFFILIATE_UPDATE)
            .target(target_types::AFFILIATE, config.id)
            .description(format!("Saved affiliate settings for {}", config.platform_name))
            .changes(&serde_json::json!(input)),
    )
    .await;

    Ok(Json(DataResponse { data: config }))
}

/// PUT /api/admin/affiliates/{id}
pub async fn toggle_affiliate(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
    Json(input): Json<ToggleAffiliate>,
) -> AppResult<impl IntoResponse> {
    let config = AffiliateRepo::set_active(&state.pool, id, input.is_active)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "AffiliateConfig",
            id,
        })?;

    record_audit(
        &state,
        &admin,
        NewAuditEntry::new(&admin.username, action_types::AFFILIATE_TOGGLE)
            .target(target_types::AFFILIATE, config.id)
            .description(format!(
                "{} affiliate for {}",
                if config.is_active { "Enabled" } else { "Disabled" },
                config.platform_name
            ))
            .changes(&serde_json::json!({ "is_active": config.is_active })),
    )
    .await;

    Ok(Json(DataResponse { data: config }))
}
