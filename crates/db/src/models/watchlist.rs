//! `watchlist` rows.

use ottradar_core::submission::{WatchlistEntry, WatchlistStatus};
use ottradar_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct WatchlistRow {
    pub id: DbId,
    pub user_id: String,
    pub email: Option<String>,
    pub movie_id: DbId,
    pub status: String,
    pub platforms_available: serde_json::Value,
    pub added_at: Timestamp,
    pub watched_at: Option<Timestamp>,
}

impl From<WatchlistRow> for WatchlistEntry {
    fn from(row: WatchlistRow) -> Self {
        let platforms_available = match row.platforms_available {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        WatchlistEntry {
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            movie_id: row.movie_id,
            status: WatchlistStatus::parse(&row.status).unwrap_or_default(),
            platforms_available,
            added_at: row.added_at,
            watched_at: row.watched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(platforms: serde_json::Value, status: &str) -> WatchlistRow {
        WatchlistRow {
            id: 1,
            user_id: "u1".into(),
            email: None,
            movie_id: 7,
            status: status.into(),
            platforms_available: platforms,
            added_at: chrono::Utc::now(),
            watched_at: None,
        }
    }

    #[test]
    fn platforms_keep_only_strings() {
        let entry = WatchlistEntry::from(row(json!(["netflix", 3, "aha"]), "watched"));
        assert_eq!(entry.platforms_available, vec!["netflix", "aha"]);
        assert_eq!(entry.status, WatchlistStatus::Watched);
    }

    #[test]
    fn malformed_values_degrade() {
        let entry = WatchlistEntry::from(row(json!({"netflix": true}), "bogus"));
        assert!(entry.platforms_available.is_empty());
        assert_eq!(entry.status, WatchlistStatus::Watchlist);
    }
}
