//! OMDb client, keyed by IMDb id.

use serde::Deserialize;

use crate::error::{parse_response, ProviderError};

const PROVIDER: &str = "OMDb";

/// OMDb's placeholder for an unknown value.
const NOT_AVAILABLE: &str = "N/A";

pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// `GET /?i={imdb_id}`. OMDb answers 200 with `Response: "False"` for
/// unknown ids.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OmdbTitle {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Rated")]
    pub rated: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbTitle {
    pub fn found(&self) -> bool {
        self.response == "True"
    }

    /// IMDb rating, when OMDb has one.
    pub fn rating(&self) -> Option<f64> {
        known(self.imdb_rating.as_deref()).and_then(|r| r.parse().ok())
    }

    pub fn plot(&self) -> Option<&str> {
        known(self.plot.as_deref())
    }

    pub fn certification(&self) -> Option<&str> {
        known(self.rated.as_deref())
    }
}

fn known(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

impl OmdbClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Look up a title; `Ok(None)` when OMDb does not know the id.
    pub async fn title(&self, imdb_id: &str) -> Result<Option<OmdbTitle>, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingKey { provider: PROVIDER })?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("i", imdb_id), ("apikey", key)])
            .send()
            .await?;

        let title: OmdbTitle = parse_response(PROVIDER, response).await?;
        if !title.found() {
            tracing::debug!(imdb_id, error = ?title.error, "OMDb has no entry");
            return Ok(None);
        }
        Ok(Some(title))
    }
}
