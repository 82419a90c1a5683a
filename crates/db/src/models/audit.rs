//! `audit_log` rows.

use ottradar_core::audit::AuditEntry;
use ottradar_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct AuditRow {
    pub id: DbId,
    pub admin_username: String,
    pub action_type: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub description: Option<String>,
    pub changes: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        AuditEntry {
            id: row.id,
            admin_username: row.admin_username,
            action_type: row.action_type,
            target_type: row.target_type,
            target_id: row.target_id,
            description: row.description,
            changes: row.changes,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
        }
    }
}

/// Filter parameters for the audit log listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub action_type: Option<String>,
    pub admin_username: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
