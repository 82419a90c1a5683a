use axum::routing::get;
use axum::Router;

use crate::handlers::watchlist;
use crate::state::AppState;

/// Watchlist routes mounted at `/api/watchlist`.
///
/// ```text
/// GET    /?user_id=              -> list_watchlist
/// POST   /                       -> add_to_watchlist
/// DELETE /?user_id=&movie_id=    -> remove_from_watchlist
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(watchlist::list_watchlist)
            .post(watchlist::add_to_watchlist)
            .delete(watchlist::remove_from_watchlist),
    )
}
