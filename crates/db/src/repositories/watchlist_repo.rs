//! Repository for the `watchlist` table.

use ottradar_core::submission::WatchlistStatus;
use ottradar_core::types::DbId;
use sqlx::PgPool;

use crate::models::watchlist::WatchlistRow;

const COLUMNS: &str = "\
    id, user_id, email, movie_id, status, platforms_available, added_at, watched_at";

pub struct WatchlistRepo;

impl WatchlistRepo {
    /// Most recently added first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<WatchlistRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watchlist WHERE user_id = $1 ORDER BY added_at DESC, id DESC"
        );
        sqlx::query_as::<_, WatchlistRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Add a movie or update its status. `watched_at` is stamped the first
    /// time the status becomes `watched`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        email: Option<&str>,
        movie_id: DbId,
        status: WatchlistStatus,
        platforms_available: &[String],
    ) -> Result<WatchlistRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO watchlist (user_id, email, movie_id, status, platforms_available, watched_at) \
             VALUES ($1, $2, $3, $4, $5, CASE WHEN $4 = 'watched' THEN NOW() END) \
             ON CONFLICT ON CONSTRAINT uq_watchlist_user_movie DO UPDATE SET \
                status = EXCLUDED.status, \
                email = COALESCE(EXCLUDED.email, watchlist.email), \
                watched_at = COALESCE(watchlist.watched_at, EXCLUDED.watched_at) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchlistRow>(&query)
            .bind(user_id)
            .bind(email)
            .bind(movie_id)
            .bind(status.as_str())
            .bind(serde_json::json!(platforms_available))
            .fetch_one(pool)
            .await
    }

    pub async fn remove(pool: &PgPool, user_id: &str, movie_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
