//! Unified title search over the active catalog.
//!
//! A query is split on whitespace and every token must appear somewhere in
//! the title (case-insensitive substring). Results are ordered by popularity;
//! there is no relevance ranking.

use std::sync::Arc;

use crate::error::CoreError;
use crate::filter::{clamp_page, Direction, MovieFilter, Page, Predicate, SortKey};
use crate::movie::Movie;
use crate::store::CatalogStore;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of results for capped searches.
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;

/// Maximum number of results for capped searches.
pub const MAX_SEARCH_LIMIT: i64 = 200;

/// Default page size for the paginated search endpoint.
pub const DEFAULT_SEARCH_PER_PAGE: u32 = 12;

/// Public searches shorter than this (after trimming) return nothing and
/// never reach the store or the external fallback.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split a query into non-empty whitespace-separated tokens.
pub fn tokenize(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

/// Clamp a user-provided limit to `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Identifier slugs use `-` for spaces: `"hi-nanna"` → `"hi nanna"`.
pub fn slug_to_title(slug: &str) -> String {
    slug.replace('-', " ").trim().to_string()
}

fn title_filter(tokens: &[&str]) -> MovieFilter {
    tokens.iter().fold(MovieFilter::new(), |f, token| {
        f.filter(Predicate::TitleContains((*token).to_string()))
    })
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct UnifiedSearch {
    store: Arc<dyn CatalogStore>,
}

impl UnifiedSearch {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Up to `limit` movies whose titles contain every token, most popular first.
    /// A blank query returns nothing.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Movie>, CoreError> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        title_filter(&tokens)
            .sort_by_popularity()
            .limit(limit)
            .all(self.store())
            .await
    }

    /// Page-based variant of [`search`](Self::search).
    pub async fn search_paginated(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Movie>, CoreError> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            let (page, per_page) = clamp_page(page, per_page);
            return Ok(Page::empty(page, per_page));
        }
        title_filter(&tokens)
            .sort_by_popularity()
            .paginate(self.store(), page, per_page)
            .await
    }

    /// Active movie with the given TMDB id.
    pub async fn by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>, CoreError> {
        MovieFilter::new()
            .filter(Predicate::TmdbId(tmdb_id))
            .first(self.store())
            .await
    }

    /// Single-substring title match, unordered.
    pub async fn by_title(&self, title: &str, limit: usize) -> Result<Vec<Movie>, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }
        MovieFilter::new()
            .filter(Predicate::TitleContains(title.to_string()))
            .limit(limit)
            .all(self.store())
            .await
    }

    /// Movies on the named platform, best rated first.
    pub async fn by_platform(&self, platform: &str, limit: usize) -> Result<Vec<Movie>, CoreError> {
        MovieFilter::new()
            .by_platform(platform)
            .sort_by(SortKey::Rating, Direction::Desc)
            .limit(limit)
            .all(self.store())
            .await
    }

    /// Resolve a detail-page identifier.
    ///
    /// All digits is a TMDB id. Otherwise the slug is turned into a title and
    /// matched exactly (case-insensitive), then as a substring with the most
    /// popular match winning.
    pub async fn resolve_identifier(&self, identifier: &str) -> Result<Option<Movie>, CoreError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }
        if identifier.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(tmdb_id) = identifier.parse::<i64>() {
                return self.by_tmdb_id(tmdb_id).await;
            }
        }

        let title = slug_to_title(identifier);
        let exact = MovieFilter::new()
            .filter(Predicate::TitleEquals(title.clone()))
            .first(self.store())
            .await?;
        if exact.is_some() {
            return Ok(exact);
        }

        MovieFilter::new()
            .filter(Predicate::TitleContains(title))
            .sort_by_popularity()
            .first(self.store())
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
