//! `affiliate_config` rows.

use ottradar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-platform affiliate settings managed from the back office.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AffiliateConfig {
    pub id: DbId,
    pub platform_name: String,
    pub affiliate_code: Option<String>,
    pub base_url: Option<String>,
    pub tracking_params: serde_json::Value,
    pub is_active: bool,
    pub updated_at: Timestamp,
}

/// Settings written by the back office for one platform.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AffiliateConfigInput {
    pub platform_name: String,
    #[serde(default)]
    pub affiliate_code: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "empty_object")]
    pub tracking_params: serde_json::Value,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

fn default_active() -> bool {
    true
}
