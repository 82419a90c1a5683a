//! Repository for the `audit_log` table.

use ottradar_core::audit::NewAuditEntry;
use sqlx::PgPool;

use crate::models::audit::{AuditQuery, AuditRow};

const COLUMNS: &str = "\
    id, admin_username, action_type, target_type, target_id, description, \
    changes, ip_address, user_agent, created_at";

/// Largest page the listing returns.
const MAX_LIMIT: i64 = 500;

pub struct AuditRepo;

impl AuditRepo {
    pub async fn insert(pool: &PgPool, entry: &NewAuditEntry) -> Result<AuditRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log \
                (admin_username, action_type, target_type, target_id, description, \
                 changes, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditRow>(&query)
            .bind(&entry.admin_username)
            .bind(&entry.action_type)
            .bind(&entry.target_type)
            .bind(entry.target_id)
            .bind(&entry.description)
            .bind(&entry.changes)
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Newest first, filtered by action type and/or admin.
    pub async fn list(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditRow>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_log \
             WHERE ($1::TEXT IS NULL OR action_type = $1) \
               AND ($2::TEXT IS NULL OR admin_username = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AuditRow>(&query)
            .bind(&params.action_type)
            .bind(&params.admin_username)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
