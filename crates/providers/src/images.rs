//! Poster availability checks for the broken-image scan.

use std::time::Duration;

use chrono::Utc;
use ottradar_core::error::CoreError;
use ottradar_core::filter::{MovieFilter, Predicate};
use ottradar_core::movie::Movie;
use ottradar_core::store::CatalogStore;
use ottradar_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::error::ProviderError;

/// Posters checked per scan unless the caller asks otherwise.
pub const DEFAULT_IMAGE_SCAN_LIMIT: usize = 100;

/// Per-request budget for one `HEAD`.
const POSTER_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one poster request.
#[derive(Debug, Clone, Serialize)]
pub struct PosterCheck {
    pub movie_id: DbId,
    pub tmdb_id: i64,
    pub title: String,
    pub url: String,
    /// `None` when no response arrived.
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: Timestamp,
}

impl PosterCheck {
    /// The image host answered 404.
    pub fn is_broken(&self) -> bool {
        self.status_code == Some(404)
    }

    pub fn is_alive(&self) -> bool {
        self.status_code.is_some_and(|s| (200..400).contains(&s))
    }
}

/// Issues `HEAD` requests against poster URLs, following redirects.
#[derive(Debug, Clone)]
pub struct PosterChecker {
    client: reqwest::Client,
}

impl PosterChecker {
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Final status code for `url`.
    pub async fn status(&self, url: &str) -> Result<u16, ProviderError> {
        let response = self
            .client
            .head(url)
            .timeout(POSTER_CHECK_TIMEOUT)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }

    async fn check(&self, movie: &Movie, url: &str) -> PosterCheck {
        let (status_code, error) = match self.status(url).await {
            Ok(status) => (Some(status), None),
            Err(e) => {
                tracing::debug!(tmdb_id = movie.tmdb_id, url, error = %e, "Poster check failed");
                (None, Some(e.to_string()))
            }
        };
        PosterCheck {
            movie_id: movie.id,
            tmdb_id: movie.tmdb_id,
            title: movie.title.clone(),
            url: url.to_string(),
            status_code,
            error,
            checked_at: Utc::now(),
        }
    }

    /// Check the posters of up to `limit` active movies, one at a time.
    ///
    /// Every attempt is returned; callers pick the broken ones with
    /// [`PosterCheck::is_broken`]. Unreachable hosts are not broken.
    pub async fn scan(
        &self,
        store: &dyn CatalogStore,
        limit: usize,
    ) -> Result<Vec<PosterCheck>, CoreError> {
        let movies = MovieFilter::new()
            .filter(Predicate::HasPoster)
            .limit(limit)
            .all(store)
            .await?;

        let mut checks = Vec::with_capacity(movies.len());
        for movie in &movies {
            if let Some(url) = movie.poster.as_deref() {
                checks.push(self.check(movie, url.trim()).await);
            }
        }

        let broken = checks.iter().filter(|c| c.is_broken()).count();
        tracing::info!(checked = checks.len(), broken, "Poster scan finished");
        Ok(checks)
    }
}
