//! `user_submissions` rows.

use ottradar_core::submission::{SubmissionStatus, SubmissionType, UserSubmission};
use ottradar_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: DbId,
    pub movie_title: String,
    pub language: Option<String>,
    pub platform_name: Option<String>,
    pub ott_link: Option<String>,
    pub comment: Option<String>,
    pub submission_type: String,
    pub category: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
}

impl From<SubmissionRow> for UserSubmission {
    fn from(row: SubmissionRow) -> Self {
        UserSubmission {
            id: row.id,
            movie_title: row.movie_title,
            language: row.language,
            platform_name: row.platform_name,
            ott_link: row.ott_link,
            comment: row.comment,
            submission_type: SubmissionType::parse(&row.submission_type),
            category: row.category,
            status: SubmissionStatus::parse(&row.status).unwrap_or(SubmissionStatus::Pending),
            created_at: row.created_at,
        }
    }
}

/// Submissions per status, for the dashboard.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SubmissionCounts {
    pub pending: i64,
    pub added: i64,
    pub rejected: i64,
}
