//! Catalog, provider and admin-job failures.
//!
//! Every crate reports through [`CoreError`]; the HTTP layer owns the
//! mapping to status codes.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A slug, title, name or category resolved to nothing.
    #[error("{entity} '{key}' not found")]
    NoMatch { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A movie with this TMDB id is already catalogued.
    #[error("Movie with TMDB id {tmdb_id} already exists")]
    DuplicateMovie { tmdb_id: i64 },

    /// A platform map, link or OTT date that cannot be stored.
    #[error("Invalid platform data: {0}")]
    InvalidPlatformData(String),

    /// The requested job is not in the script registry.
    #[error("Unknown script: {0}")]
    UnknownScript(String),

    /// A heavy job already holds the single heavy slot.
    #[error("A heavy script is already running")]
    HeavySlotBusy,

    /// A state change that the record's current state does not allow.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The provider has no credential configured.
    #[error("{provider} is not configured")]
    ProviderUnavailable { provider: &'static str },

    /// The provider answered with an error or an unreadable body.
    #[error("{provider} request failed: {message}")]
    ProviderFailed {
        provider: &'static str,
        message: String,
    },

    #[error("Admin login required")]
    AdminRequired,

    #[error("Internal error: {0}")]
    Internal(String),
}
