//! Repository for the `ott_snapshot` table (daily platform rollups).

use ottradar_core::metrics::DailySnapshot;
use sqlx::PgPool;

use crate::models::snapshot::SnapshotRow;

const COLUMNS: &str = "\
    id, snapshot_date, netflix_count, prime_count, hotstar_count, total_count, \
    free_count, platforms, created_at";

pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Insert the day's rollup, replacing an earlier one for the same date.
    pub async fn upsert(pool: &PgPool, snapshot: &DailySnapshot) -> Result<SnapshotRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO ott_snapshot \
                (snapshot_date, netflix_count, prime_count, hotstar_count, total_count, free_count, platforms) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_ott_snapshot_date DO UPDATE SET \
                netflix_count = EXCLUDED.netflix_count, \
                prime_count = EXCLUDED.prime_count, \
                hotstar_count = EXCLUDED.hotstar_count, \
                total_count = EXCLUDED.total_count, \
                free_count = EXCLUDED.free_count, \
                platforms = EXCLUDED.platforms \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SnapshotRow>(&query)
            .bind(snapshot.date)
            .bind(snapshot.netflix_count as i64)
            .bind(snapshot.prime_count as i64)
            .bind(snapshot.hotstar_count as i64)
            .bind(snapshot.total_count as i64)
            .bind(snapshot.free_count as i64)
            .bind(serde_json::json!(snapshot.platforms))
            .fetch_one(pool)
            .await
    }

    /// Latest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<SnapshotRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ott_snapshot ORDER BY snapshot_date DESC LIMIT $1"
        );
        sqlx::query_as::<_, SnapshotRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
