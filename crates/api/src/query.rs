//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Page-based parameters (`?page=&per_page=`) for catalog listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageParams {
    /// Requested page and size, falling back to page 1 and `default_per_page`.
    pub fn resolve(&self, default_per_page: u32) -> (u32, u32) {
        (
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(default_per_page),
        )
    }
}
