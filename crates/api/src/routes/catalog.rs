//! Public catalog routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes mounted at `/api`.
///
/// ```text
/// GET  /search                -> search
/// GET  /movies/{category}     -> list_category
/// GET  /home                  -> homepage
/// GET  /filter                -> filter_movies
/// GET  /movie/{identifier}    -> movie_detail
/// GET  /series                -> list_series
/// GET  /series/{name}         -> series_detail
/// GET  /person/{name}         -> person_detail
/// POST /suggest               -> suggest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(catalog::search))
        .route("/movies/{category}", get(catalog::list_category))
        .route("/home", get(catalog::homepage))
        .route("/filter", get(catalog::filter_movies))
        .route("/movie/{identifier}", get(catalog::movie_detail))
        .route("/series", get(catalog::list_series))
        .route("/series/{name}", get(catalog::series_detail))
        .route("/person/{name}", get(catalog::person_detail))
        .route("/suggest", post(catalog::suggest))
}
