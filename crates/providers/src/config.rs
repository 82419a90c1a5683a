//! Provider configuration loaded from environment variables.

use std::time::Duration;

/// Default TMDB REST base URL.
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default OMDb base URL.
pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default streaming-availability (RapidAPI) base URL.
pub const STREAMING_BASE_URL: &str = "https://streaming-availability.p.rapidapi.com";

/// Host header RapidAPI routes on.
pub const STREAMING_API_HOST: &str = "streaming-availability.p.rapidapi.com";

/// Keys, region and endpoints for the external metadata providers.
///
/// A missing key disables that provider; enrichment then degrades to
/// whatever the remaining providers return.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub rapid_api_key: Option<String>,
    /// Watch-region code, e.g. `IN`.
    pub region: String,
    pub timeout: Duration,
    pub tmdb_base_url: String,
    pub omdb_base_url: String,
    pub streaming_base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            omdb_api_key: None,
            rapid_api_key: None,
            region: "IN".to_string(),
            timeout: Duration::from_secs(10),
            tmdb_base_url: TMDB_BASE_URL.to_string(),
            omdb_base_url: OMDB_BASE_URL.to_string(),
            streaming_base_url: STREAMING_BASE_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var                | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `TMDB_API_KEY`         | unset (TMDB disabled)                     |
    /// | `OMDB_API_KEY`         | unset (OMDb disabled)                     |
    /// | `RAPID_API_KEY`        | unset (streaming lookup disabled)         |
    /// | `OTT_REGION`           | `IN`                                      |
    /// | `PROVIDER_TIMEOUT_SECS`| `10`                                      |
    /// | `TMDB_BASE_URL`        | `https://api.themoviedb.org/3`            |
    /// | `OMDB_BASE_URL`        | `https://www.omdbapi.com/`                |
    /// | `STREAMING_BASE_URL`   | `https://streaming-availability.p.rapidapi.com` |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let key = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let timeout_secs: u64 = std::env::var("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("PROVIDER_TIMEOUT_SECS must be a valid u64");

        Self {
            tmdb_api_key: key("TMDB_API_KEY"),
            omdb_api_key: key("OMDB_API_KEY"),
            rapid_api_key: key("RAPID_API_KEY"),
            region: std::env::var("OTT_REGION").unwrap_or(defaults.region),
            timeout: Duration::from_secs(timeout_secs),
            tmdb_base_url: std::env::var("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            omdb_base_url: std::env::var("OMDB_BASE_URL").unwrap_or(defaults.omdb_base_url),
            streaming_base_url: std::env::var("STREAMING_BASE_URL")
                .unwrap_or(defaults.streaming_base_url),
        }
    }
}
