//! The provider seam used by the enrichment merger and the search fallback.

use std::future::Future;

use ottradar_core::platforms::PlatformMap;
use serde::Serialize;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::images::PosterChecker;
use crate::omdb::{OmdbClient, OmdbTitle};
use crate::streaming::StreamingClient;
use crate::tmdb::{DiscoveredMovie, ReleaseDates, TmdbClient, TmdbMovie};

/// Primary (TMDB), secondary (OMDb) and tertiary (streaming availability)
/// metadata providers.
pub trait MetadataSource: Send + Sync + 'static {
    /// Watch region used for provider and release-date lookups (e.g. `IN`).
    fn region(&self) -> &str;

    fn movie_details(
        &self,
        tmdb_id: i64,
    ) -> impl Future<Output = Result<TmdbMovie, ProviderError>> + Send;

    fn release_dates(
        &self,
        tmdb_id: i64,
    ) -> impl Future<Output = Result<ReleaseDates, ProviderError>> + Send;

    /// Whether the secondary provider has a credential.
    fn has_secondary(&self) -> bool;

    fn secondary_title(
        &self,
        imdb_id: &str,
    ) -> impl Future<Output = Result<Option<OmdbTitle>, ProviderError>> + Send;

    /// Whether the tertiary provider has a credential.
    fn has_tertiary(&self) -> bool;

    fn streaming_availability(
        &self,
        imdb_id: &str,
    ) -> impl Future<Output = Result<PlatformMap, ProviderError>> + Send;

    fn fetch_new_movies(
        &self,
        year: i32,
        language: &str,
        limit: usize,
        pages: u32,
    ) -> impl Future<Output = Result<Vec<DiscoveredMovie>, ProviderError>> + Send;
}

/// Which providers have a credential configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub tmdb: bool,
    pub omdb: bool,
    pub streaming: bool,
}

/// Production [`MetadataSource`] backed by the three HTTP clients, sharing
/// one connection pool and timeout.
pub struct HttpMetadataSource {
    client: reqwest::Client,
    tmdb: TmdbClient,
    omdb: OmdbClient,
    streaming: StreamingClient,
    region: String,
}

impl HttpMetadataSource {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        tracing::info!(
            tmdb = config.tmdb_api_key.is_some(),
            omdb = config.omdb_api_key.is_some(),
            streaming = config.rapid_api_key.is_some(),
            region = %config.region,
            "Metadata providers configured",
        );

        Ok(Self {
            tmdb: TmdbClient::with_client(
                client.clone(),
                config.tmdb_base_url.clone(),
                config.tmdb_api_key.clone(),
            ),
            omdb: OmdbClient::with_client(
                client.clone(),
                config.omdb_base_url.clone(),
                config.omdb_api_key.clone(),
            ),
            streaming: StreamingClient::with_client(
                client.clone(),
                config.streaming_base_url.clone(),
                config.rapid_api_key.clone(),
            ),
            region: config.region.clone(),
            client,
        })
    }

    pub fn tmdb(&self) -> &TmdbClient {
        &self.tmdb
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            tmdb: self.tmdb.is_configured(),
            omdb: self.omdb.is_configured(),
            streaming: self.streaming.is_configured(),
        }
    }

    /// Poster checker sharing this source's connection pool.
    pub fn poster_checker(&self) -> PosterChecker {
        PosterChecker::with_client(self.client.clone())
    }
}

impl MetadataSource for HttpMetadataSource {
    fn region(&self) -> &str {
        &self.region
    }

    async fn movie_details(&self, tmdb_id: i64) -> Result<TmdbMovie, ProviderError> {
        self.tmdb.movie_details(tmdb_id).await
    }

    async fn release_dates(&self, tmdb_id: i64) -> Result<ReleaseDates, ProviderError> {
        self.tmdb.release_dates(tmdb_id).await
    }

    fn has_secondary(&self) -> bool {
        self.omdb.is_configured()
    }

    async fn secondary_title(&self, imdb_id: &str) -> Result<Option<OmdbTitle>, ProviderError> {
        self.omdb.title(imdb_id).await
    }

    fn has_tertiary(&self) -> bool {
        self.streaming.is_configured()
    }

    async fn streaming_availability(&self, imdb_id: &str) -> Result<PlatformMap, ProviderError> {
        let country = self.region.to_lowercase();
        self.streaming.availability(imdb_id, &country).await
    }

    async fn fetch_new_movies(
        &self,
        year: i32,
        language: &str,
        limit: usize,
        pages: u32,
    ) -> Result<Vec<DiscoveredMovie>, ProviderError> {
        self.tmdb.fetch_new_movies(year, language, limit, pages).await
    }
}
