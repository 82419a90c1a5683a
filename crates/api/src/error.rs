use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ottradar_core::error::CoreError;
use serde_json::json;

/// Failure of an HTTP handler, rendered as `{"error": .., "code": ..}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Raw sqlx failure from a handler that queries the pool directly.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A query-string parameter (sort, status filter) outside its vocabulary.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Message returned in place of anything that would leak internals.
const SANITIZED: &str = "An internal error occurred";

impl AppError {
    /// Status, stable machine code and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, "INVALID_QUERY", msg.clone()),
        }
    }
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        CoreError::NotFound { .. } | CoreError::NoMatch { .. } => {
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        }
        CoreError::Validation(msg) => {
            return (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::DuplicateMovie { .. } => (StatusCode::CONFLICT, "DUPLICATE_MOVIE"),
        CoreError::InvalidPlatformData(msg) => {
            return (StatusCode::BAD_REQUEST, "INVALID_PLATFORM_DATA", msg.clone())
        }
        CoreError::UnknownScript(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_SCRIPT"),
        CoreError::HeavySlotBusy => (StatusCode::CONFLICT, "HEAVY_JOB_RUNNING"),
        CoreError::Conflict(msg) => return (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::ProviderUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
        }
        CoreError::ProviderFailed { provider, message } => {
            tracing::warn!(provider, error = %message, "Upstream provider failed");
            return (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_ERROR",
                format!("{provider} request failed"),
            );
        }
        CoreError::AdminRequired => (StatusCode::UNAUTHORIZED, "ADMIN_REQUIRED"),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                SANITIZED.to_string(),
            );
        }
    };
    (status, code, err.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

/// Row-not-found is a 404, `uq_*` unique violations a 409, the rest a
/// sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            let constraint = db_err.constraint().unwrap_or_default();
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                SANITIZED.to_string(),
            )
        }
    }
}
