//! Repository for the `affiliate_config` table.

use ottradar_core::types::DbId;
use sqlx::PgPool;

use crate::models::affiliate::{AffiliateConfig, AffiliateConfigInput};

const COLUMNS: &str = "\
    id, platform_name, affiliate_code, base_url, tracking_params, is_active, updated_at";

pub struct AffiliateRepo;

impl AffiliateRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<AffiliateConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affiliate_config ORDER BY platform_name");
        sqlx::query_as::<_, AffiliateConfig>(&query)
            .fetch_all(pool)
            .await
    }

    /// Create or replace the settings for `input.platform_name`.
    pub async fn upsert(
        pool: &PgPool,
        input: &AffiliateConfigInput,
    ) -> Result<AffiliateConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO affiliate_config \
                (platform_name, affiliate_code, base_url, tracking_params, is_active) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_affiliate_config_platform DO UPDATE SET \
                affiliate_code = EXCLUDED.affiliate_code, \
                base_url = EXCLUDED.base_url, \
                tracking_params = EXCLUDED.tracking_params, \
                is_active = EXCLUDED.is_active, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AffiliateConfig>(&query)
            .bind(input.platform_name.trim())
            .bind(&input.affiliate_code)
            .bind(&input.base_url)
            .bind(&input.tracking_params)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        active: bool,
    ) -> Result<Option<AffiliateConfig>, sqlx::Error> {
        let query = format!(
            "UPDATE affiliate_config SET is_active = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AffiliateConfig>(&query)
            .bind(id)
            .bind(active)
            .fetch_optional(pool)
            .await
    }
}
