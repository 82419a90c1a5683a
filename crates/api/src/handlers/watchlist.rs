//! Viewer watchlists, keyed by the caller-supplied user id.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ottradar_core::error::CoreError;
use ottradar_core::submission::{WatchlistEntry, WatchlistStatus};
use ottradar_core::types::DbId;
use ottradar_db::repositories::WatchlistRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WatchlistParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddToWatchlist {
    pub user_id: String,
    pub email: Option<String>,
    pub movie_id: DbId,
    #[serde(default)]
    pub status: WatchlistStatus,
}

#[derive(Debug, Deserialize)]
pub struct RemoveParams {
    pub user_id: String,
    pub movie_id: DbId,
}

fn require_user(user_id: &str) -> Result<&str, CoreError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(CoreError::Validation("user_id is required".into()));
    }
    Ok(user_id)
}

/// GET /api/watchlist?user_id=
pub async fn list_watchlist(
    State(state): State<AppState>,
    Query(params): Query<WatchlistParams>,
) -> AppResult<impl IntoResponse> {
    let user_id = require_user(&params.user_id)?;
    let entries: Vec<WatchlistEntry> = WatchlistRepo::list_for_user(&state.pool, user_id)
        .await?
        .into_iter()
        .map(WatchlistEntry::from)
        .collect();
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/watchlist
///
/// Adds the movie or updates its status. The platforms the movie is on
/// right now are recorded with the entry.
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(input): Json<AddToWatchlist>,
) -> AppResult<impl IntoResponse> {
    let user_id = require_user(&input.user_id)?;
    let movie = state
        .catalog
        .find_by_id(input.movie_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Movie",
            id: input.movie_id,
        })?;

    let platforms: Vec<String> = movie.ott_platforms.keys().cloned().collect();
    let email = input.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

    let row = WatchlistRepo::upsert(
        &state.pool,
        user_id,
        email,
        movie.id,
        input.status,
        &platforms,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: WatchlistEntry::from(row),
        }),
    ))
}

/// DELETE /api/watchlist?user_id=&movie_id=
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Query(params): Query<RemoveParams>,
) -> AppResult<StatusCode> {
    let user_id = require_user(&params.user_id)?;
    if !WatchlistRepo::remove(&state.pool, user_id, params.movie_id).await? {
        return Err(CoreError::NotFound {
            entity: "WatchlistEntry",
            id: params.movie_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
