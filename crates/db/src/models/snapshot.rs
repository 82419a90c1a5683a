//! `ott_snapshot` rows.

use chrono::NaiveDate;
use ottradar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SnapshotRow {
    pub id: DbId,
    pub snapshot_date: NaiveDate,
    pub netflix_count: i64,
    pub prime_count: i64,
    pub hotstar_count: i64,
    pub total_count: i64,
    pub free_count: i64,
    /// Platform key → active movie count.
    pub platforms: serde_json::Value,
    pub created_at: Timestamp,
}
