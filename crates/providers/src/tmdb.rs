//! TMDB client: movie details with appended sub-resources, release dates,
//! and the discover listing used to import new titles.

use std::collections::BTreeMap;

use ottradar_core::movie::NewMovie;
use ottradar_core::platforms::{PlatformAvailability, PlatformMap};
use serde::Deserialize;

use crate::error::{parse_response, ProviderError};

const PROVIDER: &str = "TMDB";

/// Sub-resources requested alongside the movie details.
const APPEND_TO_RESPONSE: &str = "external_ids,videos,watch/providers";

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const LOGO_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Release types at or above this are digital/physical releases.
const DIGITAL_RELEASE_TYPE: i32 = 4;

/// HTTP client for the TMDB v3 REST API.
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// `GET /movie/{id}` with `external_ids`, `videos` and `watch/providers` appended.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    pub genres: Vec<TmdbGenre>,
    pub vote_average: f64,
    pub popularity: f64,
    pub original_language: Option<String>,
    pub external_ids: Option<ExternalIds>,
    pub videos: Option<VideoList>,
    #[serde(rename = "watch/providers")]
    pub watch_providers: Option<WatchProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExternalIds {
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoList {
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchProviders {
    /// Keyed by ISO 3166-1 region code.
    pub results: BTreeMap<String, RegionProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegionProviders {
    pub link: Option<String>,
    pub flatrate: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchProvider {
    pub provider_id: i64,
    pub provider_name: String,
    pub logo_path: Option<String>,
}

impl TmdbMovie {
    /// The IMDb id from the appended external ids, if non-blank.
    pub fn imdb_id(&self) -> Option<&str> {
        self.external_ids
            .as_ref()
            .and_then(|ids| ids.imdb_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    /// Key of the first YouTube video.
    pub fn youtube_trailer_id(&self) -> Option<&str> {
        self.videos
            .as_ref()?
            .results
            .iter()
            .find(|v| v.site == "YouTube" && !v.key.is_empty())
            .map(|v| v.key.as_str())
    }

    pub fn poster_url(&self) -> Option<String> {
        non_blank(self.poster_path.as_deref()).map(|p| format!("{POSTER_BASE_URL}{p}"))
    }

    /// Genre names joined with `", "`.
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Subscription providers in `region`, keyed by lowercased provider name.
    pub fn flatrate_platforms(&self, region: &str) -> PlatformMap {
        let Some(providers) = self
            .watch_providers
            .as_ref()
            .and_then(|wp| wp.results.get(region))
        else {
            return PlatformMap::new();
        };

        providers
            .flatrate
            .iter()
            .map(|p| {
                let entry = PlatformAvailability {
                    provider_id: Some(p.provider_id),
                    logo: non_blank(p.logo_path.as_deref())
                        .map(|path| format!("{LOGO_BASE_URL}{path}")),
                    ..PlatformAvailability::default()
                };
                (p.provider_name.to_lowercase(), entry)
            })
            .collect()
    }
}

/// `GET /movie/{id}/release_dates`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReleaseDates {
    pub results: Vec<RegionReleases>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegionReleases {
    pub iso_3166_1: String,
    pub release_dates: Vec<ReleaseDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReleaseDate {
    pub release_date: String,
    #[serde(rename = "type")]
    pub release_type: i32,
}

impl ReleaseDates {
    /// Date part of the first digital or physical release in `region`.
    pub fn ott_release_date(&self, region: &str) -> Option<String> {
        self.results
            .iter()
            .filter(|r| r.iso_3166_1 == region)
            .flat_map(|r| r.release_dates.iter())
            .find(|d| d.release_type >= DIGITAL_RELEASE_TYPE)
            .and_then(|d| d.release_date.get(..10))
            .map(str::to_string)
    }
}

/// One page of `GET /discover/movie`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscoverPage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<DiscoverItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscoverItem {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub popularity: f64,
    pub original_language: Option<String>,
}

/// A discover result reduced to the fields the catalog imports.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster: Option<String>,
    pub release_date: Option<String>,
    pub rating: f64,
    pub popularity: f64,
    pub language: String,
}

impl DiscoveredMovie {
    fn from_item(item: DiscoverItem, language: &str) -> Self {
        Self {
            tmdb_id: item.id,
            poster: non_blank(item.poster_path.as_deref()).map(|p| format!("{POSTER_BASE_URL}{p}")),
            overview: item.overview.filter(|o| !o.trim().is_empty()),
            release_date: item.release_date.filter(|d| !d.trim().is_empty()),
            rating: item.vote_average,
            popularity: item.popularity,
            language: item
                .original_language
                .unwrap_or_else(|| language.to_string()),
            title: item.title,
        }
    }

    /// Insert DTO for a title imported from a search fallback.
    pub fn into_new_movie(self, source: &str) -> NewMovie {
        NewMovie {
            tmdb_id: self.tmdb_id,
            title: self.title,
            overview: self.overview,
            poster: self.poster,
            release_date: self.release_date,
            rating: self.rating,
            popularity: self.popularity,
            language: self.language,
            source: source.to_string(),
            ..NewMovie::default()
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl TmdbClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Reuse an existing [`reqwest::Client`] (shared pool and timeout).
    pub fn with_client(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Movie details plus external ids, videos and watch providers.
    pub async fn movie_details(&self, tmdb_id: i64) -> Result<TmdbMovie, ProviderError> {
        let key = self.key()?;
        let response = self
            .client
            .get(format!("{}/movie/{tmdb_id}", self.base_url))
            .query(&[("api_key", key), ("append_to_response", APPEND_TO_RESPONSE)])
            .send()
            .await?;

        parse_response(PROVIDER, response).await
    }

    pub async fn release_dates(&self, tmdb_id: i64) -> Result<ReleaseDates, ProviderError> {
        let key = self.key()?;
        let response = self
            .client
            .get(format!("{}/movie/{tmdb_id}/release_dates", self.base_url))
            .query(&[("api_key", key)])
            .send()
            .await?;

        parse_response(PROVIDER, response).await
    }

    /// One page of the most popular `language` titles released in `year`.
    pub async fn discover(
        &self,
        year: i32,
        language: &str,
        page: u32,
    ) -> Result<DiscoverPage, ProviderError> {
        let key = self.key()?;
        let year = year.to_string();
        let page = page.to_string();
        let response = self
            .client
            .get(format!("{}/discover/movie", self.base_url))
            .query(&[
                ("api_key", key),
                ("primary_release_year", year.as_str()),
                ("with_original_language", language),
                ("sort_by", "popularity.desc"),
                ("page", page.as_str()),
            ])
            .send()
            .await?;

        parse_response(PROVIDER, response).await
    }

    /// Walk up to `pages` discover pages, collecting at most `limit` titles.
    ///
    /// A failing page ends the walk; titles gathered so far are returned. An
    /// unconfigured key is still an error.
    pub async fn fetch_new_movies(
        &self,
        year: i32,
        language: &str,
        limit: usize,
        pages: u32,
    ) -> Result<Vec<DiscoveredMovie>, ProviderError> {
        self.key()?;
        let mut movies = Vec::new();

        for page in 1..=pages {
            let listing = match self.discover(year, language, page).await {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!(provider = PROVIDER, page, error = %e, "Discover page failed");
                    break;
                }
            };
            let last_page = listing.total_pages <= page;

            for item in listing.results {
                if movies.len() >= limit {
                    return Ok(movies);
                }
                movies.push(DiscoveredMovie::from_item(item, language));
            }
            if last_page {
                break;
            }
        }

        movies.truncate(limit);
        Ok(movies)
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingKey { provider: PROVIDER })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn details() -> TmdbMovie {
        serde_json::from_value(json!({
            "id": 1131774,
            "title": "Salaar",
            "overview": "A gang leader tries to keep a promise.",
            "poster_path": "/salaar.jpg",
            "runtime": 175,
            "genres": [{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}],
            "vote_average": 6.9,
            "original_language": "te",
            "external_ids": {"imdb_id": "tt13927994"},
            "videos": {"results": [
                {"key": "vimeo1", "site": "Vimeo", "type": "Trailer"},
                {"key": "yt123", "site": "YouTube", "type": "Trailer"}
            ]},
            "watch/providers": {"results": {
                "IN": {"flatrate": [
                    {"provider_id": 8, "provider_name": "Netflix", "logo_path": "/n.png"}
                ]},
                "US": {"flatrate": [
                    {"provider_id": 9, "provider_name": "Amazon Prime Video"}
                ]}
            }}
        }))
        .unwrap()
    }

    #[test]
    fn details_accessors() {
        let movie = details();
        assert_eq!(movie.imdb_id(), Some("tt13927994"));
        assert_eq!(movie.youtube_trailer_id(), Some("yt123"));
        assert_eq!(movie.genre_names(), "Action, Crime");
        assert_eq!(
            movie.poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/salaar.jpg")
        );
    }

    #[test]
    fn flatrate_is_region_scoped() {
        let platforms = details().flatrate_platforms("IN");
        assert_eq!(platforms.len(), 1);
        let netflix = &platforms["netflix"];
        assert_eq!(netflix.provider_id, Some(8));
        assert_eq!(
            netflix.logo.as_deref(),
            Some("https://image.tmdb.org/t/p/original/n.png")
        );
        assert!(details().flatrate_platforms("GB").is_empty());
    }

    #[test]
    fn sparse_details_decode() {
        let movie: TmdbMovie = serde_json::from_value(json!({"id": 1, "title": "X"})).unwrap();
        assert_eq!(movie.imdb_id(), None);
        assert_eq!(movie.youtube_trailer_id(), None);
        assert!(movie.flatrate_platforms("IN").is_empty());
    }

    #[test]
    fn ott_release_date_needs_digital_release_in_region() {
        let dates: ReleaseDates = serde_json::from_value(json!({"results": [
            {"iso_3166_1": "US", "release_dates": [
                {"type": 4, "release_date": "2024-01-01T00:00:00.000Z"}
            ]},
            {"iso_3166_1": "IN", "release_dates": [
                {"type": 3, "release_date": "2023-12-22T00:00:00.000Z"},
                {"type": 4, "release_date": "2024-01-20T00:00:00.000Z"}
            ]}
        ]}))
        .unwrap();
        assert_eq!(dates.ott_release_date("IN").as_deref(), Some("2024-01-20"));
        assert_eq!(dates.ott_release_date("GB"), None);
    }

    #[test]
    fn discovered_movie_maps_to_insert_dto() {
        let item = DiscoverItem {
            id: 42,
            title: "Hanu Man".into(),
            poster_path: Some("/h.jpg".into()),
            overview: Some("".into()),
            vote_average: 7.2,
            popularity: 40.0,
            ..DiscoverItem::default()
        };
        let new = DiscoveredMovie::from_item(item, "te").into_new_movie("search_fallback");
        assert_eq!(new.tmdb_id, 42);
        assert_eq!(new.language, "te");
        assert_eq!(new.overview, None);
        assert_eq!(new.poster.as_deref(), Some("https://image.tmdb.org/t/p/w500/h.jpg"));
        assert_eq!(new.source, "search_fallback");
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let client = TmdbClient::new("http://127.0.0.1:9".into(), None);
        assert!(!client.is_configured());
        assert_matches!(
            client.movie_details(1).await,
            Err(ProviderError::MissingKey { provider: "TMDB" })
        );
        assert_matches!(
            client.fetch_new_movies(2024, "te", 10, 2).await,
            Err(ProviderError::MissingKey { .. })
        );
    }
}
