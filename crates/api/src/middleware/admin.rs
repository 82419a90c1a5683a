//! Admin identity extractor.
//!
//! Login and sessions live in the upstream auth layer, which forwards the
//! signed-in admin's username in the `x-admin-user` header.

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use ottradar_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

pub const ADMIN_USER_HEADER: &str = "x-admin-user";

/// The admin performing a back-office request, plus the client details
/// recorded on audit entries.
///
/// ```ignore
/// async fn my_handler(admin: AdminUser) -> AppResult<Json<()>> {
///     tracing::info!(admin = %admin.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub username: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let username = header_str(parts, ADMIN_USER_HEADER)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(AppError::Core(CoreError::AdminRequired))?
            .to_string();

        // First hop of X-Forwarded-For, else X-Real-IP.
        let ip_address = header_str(parts, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .or_else(|| header_str(parts, "x-real-ip"))
            .map(str::to_string);

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(AdminUser {
            username,
            ip_address,
            user_agent,
        })
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
