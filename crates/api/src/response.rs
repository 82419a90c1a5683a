//! Shared response envelope types for API handlers.
//!
//! JSON endpoints answer with a `{ "data": ... }` envelope. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Search results in the shape the search page consumes.
#[derive(Debug, Serialize)]
pub struct SearchResponse<T: Serialize> {
    pub results: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}
