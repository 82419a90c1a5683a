pub mod admin;
pub mod catalog;
pub mod health;
pub mod scripts;
pub mod watchlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /search, /home, /filter, /suggest        public catalog
/// /movies/{category}                       listing pages
/// /movie/{identifier}                      detail (TMDB id or slug)
/// /series, /series/{name}                  series index and seasons
/// /person/{name}                           cast page
/// /watchlist                               viewer watchlist
///
/// /admin/...                               back office (x-admin-user)
/// /admin/scripts/...                       script runs
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/watchlist", watchlist::router())
        .nest("/admin/scripts", scripts::router())
        .nest("/admin", admin::router())
}
