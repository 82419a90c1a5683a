//! Audit trail constants and helpers for admin actions.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for audit log entries.
pub mod action_types {
    pub const MOVIE_EDIT: &str = "movie_edit";
    pub const MOVIE_ENRICH: &str = "movie_enrich";
    pub const BULK_UPDATE: &str = "bulk_update";
    pub const BULK_DELETE: &str = "bulk_delete";
    pub const SCRIPT_RUN: &str = "script_run";
    pub const SUBMISSION_APPROVE: &str = "submission_approve";
    pub const SUBMISSION_REJECT: &str = "submission_reject";
    pub const SUBMISSION_DELETE: &str = "submission_delete";
    pub const SNAPSHOT: &str = "snapshot";
    pub const MOVIE_IMPORT: &str = "movie_import";
    pub const OTT_REFRESH: &str = "ott_refresh";
    pub const OTT_ENTRY: &str = "ott_entry";
    pub const IMAGE_SCAN: &str = "image_scan";
    pub const CACHE_CLEAR: &str = "cache_clear";
    pub const AFFILIATE_TOGGLE: &str = "affiliate_toggle";
    pub const AFFILIATE_UPDATE: &str = "affiliate_update";
}

/// Known target types.
pub mod target_types {
    pub const MOVIE: &str = "movie";
    pub const SUBMISSION: &str = "submission";
    pub const SCRIPT: &str = "script";
    pub const SNAPSHOT: &str = "snapshot";
    pub const AFFILIATE: &str = "affiliate";
    pub const CACHE: &str = "cache";
}

/// Longest user agent kept on an entry.
pub const MAX_USER_AGENT_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Entry types
// ---------------------------------------------------------------------------

/// A persisted audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
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

/// Insert DTO for an audit entry.
#[derive(Debug, Clone, Default)]
pub struct NewAuditEntry {
    pub admin_username: String,
    pub action_type: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub description: Option<String>,
    pub changes: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewAuditEntry {
    pub fn new(admin_username: &str, action_type: &str) -> Self {
        Self {
            admin_username: admin_username.to_string(),
            action_type: action_type.to_string(),
            ..Self::default()
        }
    }

    pub fn target(mut self, target_type: &str, target_id: i64) -> Self {
        self.target_type = Some(target_type.to_string());
        self.target_id = Some(target_id);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a change payload; sensitive fields are redacted first.
    pub fn changes(mut self, changes: &serde_json::Value) -> Self {
        self.changes = Some(redact_sensitive_fields(changes));
        self
    }

    pub fn client(mut self, ip_address: Option<String>, user_agent: Option<&str>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent.map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect());
        self
    }
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Fields that are redacted from change payloads before storage.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "api_key",
    "apikey",
    "authorization",
    "credential",
];

/// Replace the value of any key containing a [`SENSITIVE_FIELDS`] entry with
/// `"[REDACTED]"`, recursively.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
