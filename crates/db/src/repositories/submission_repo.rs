//! Repository for the `user_submissions` table.

use ottradar_core::submission::{NewSubmission, SubmissionStatus};
use ottradar_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission::{SubmissionCounts, SubmissionRow};

const COLUMNS: &str = "\
    id, movie_title, language, platform_name, ott_link, comment, \
    submission_type, category, status, created_at";

pub struct SubmissionRepo;

impl SubmissionRepo {
    pub async fn create(pool: &PgPool, input: &NewSubmission) -> Result<SubmissionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_submissions \
                (movie_title, language, platform_name, ott_link, comment, submission_type, category) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(&input.movie_title)
            .bind(&input.language)
            .bind(&input.platform_name)
            .bind(&input.ott_link)
            .bind(&input.comment)
            .bind(input.submission_type.as_str())
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_submissions WHERE id = $1");
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first, optionally restricted to one status.
    pub async fn list(
        pool: &PgPool,
        status: Option<SubmissionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_submissions \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(status.map(SubmissionStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE user_submissions SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(pool: &PgPool) -> Result<SubmissionCounts, sqlx::Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*)::BIGINT FROM user_submissions GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        let mut counts = SubmissionCounts::default();
        for (status, n) in rows {
            match SubmissionStatus::parse(&status) {
                Some(SubmissionStatus::Pending) => counts.pending = n,
                Some(SubmissionStatus::Added) => counts.added = n,
                Some(SubmissionStatus::Rejected) => counts.rejected = n,
                None => {}
            }
        }
        Ok(counts)
    }
}
