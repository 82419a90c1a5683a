//! Repository for the `link_health_checks` table.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::link_health::{LinkHealthCheck, NewLinkHealthCheck};

const COLUMNS: &str = "\
    id, movie_id, platform_name, url, status_code, is_healthy, error_message, checked_at";

pub struct LinkHealthRepo;

impl LinkHealthRepo {
    /// Insert a batch of checks in one statement. Returns rows written.
    pub async fn record(pool: &PgPool, checks: &[NewLinkHealthCheck]) -> Result<u64, sqlx::Error> {
        if checks.is_empty() {
            return Ok(0);
        }
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO link_health_checks \
                (movie_id, platform_name, url, status_code, is_healthy, error_message, checked_at) ",
        );
        qb.push_values(checks, |mut row, check| {
            row.push_bind(check.movie_id)
                .push_bind(check.platform_name.clone())
                .push_bind(check.url.clone())
                .push_bind(check.status_code)
                .push_bind(check.is_healthy)
                .push_bind(check.error_message.clone())
                .push_bind(check.checked_at);
        });
        Ok(qb.build().execute(pool).await?.rows_affected())
    }

    /// Latest first, optionally only the failures.
    pub async fn list_recent(
        pool: &PgPool,
        unhealthy_only: bool,
        limit: i64,
    ) -> Result<Vec<LinkHealthCheck>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM link_health_checks \
             WHERE NOT ($1 AND is_healthy) \
             ORDER BY checked_at DESC, id DESC LIMIT $2"
        );
        sqlx::query_as::<_, LinkHealthCheck>(&query)
            .bind(unhealthy_only)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
