//! `link_health_checks` rows.

use ottradar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LinkHealthCheck {
    pub id: DbId,
    pub movie_id: DbId,
    /// Platform key, or `poster` for image checks.
    pub platform_name: String,
    pub url: String,
    pub status_code: Option<i32>,
    pub is_healthy: bool,
    pub error_message: Option<String>,
    pub checked_at: Timestamp,
}

/// Insert DTO for one URL check.
#[derive(Debug, Clone)]
pub struct NewLinkHealthCheck {
    pub movie_id: DbId,
    pub platform_name: String,
    pub url: String,
    pub status_code: Option<i32>,
    pub is_healthy: bool,
    pub error_message: Option<String>,
    pub checked_at: Timestamp,
}
