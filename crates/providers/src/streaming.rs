//! Streaming Availability (RapidAPI) client.
//!
//! The `streamingInfo` payload has shipped in two shapes: an object per
//! service, or a list of offers per service. Both are folded into a
//! [`PlatformMap`] keyed by the service name.

use ottradar_core::platforms::{PlatformAvailability, PlatformMap};
use serde::Deserialize;
use serde_json::Value;

use crate::config::STREAMING_API_HOST;
use crate::error::{parse_response, ProviderError};

const PROVIDER: &str = "StreamingAvailability";

pub struct StreamingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BasicResponse {
    result: Option<BasicResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BasicResult {
    #[serde(rename = "streamingInfo")]
    streaming_info: serde_json::Map<String, Value>,
}

impl StreamingClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

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

    /// Services carrying `imdb_id` in `country` (lowercase ISO code).
    pub async fn availability(
        &self,
        imdb_id: &str,
        country: &str,
    ) -> Result<PlatformMap, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingKey { provider: PROVIDER })?;

        let response = self
            .client
            .get(format!("{}/v2/get/basic", self.base_url))
            .header("X-RapidAPI-Key", key)
            .header("X-RapidAPI-Host", STREAMING_API_HOST)
            .query(&[("country", country), ("imdb_id", imdb_id)])
            .send()
            .await?;

        let body: BasicResponse = parse_response(PROVIDER, response).await?;
        let info = body
            .result
            .and_then(|r| r.streaming_info.get(country).cloned())
            .unwrap_or(Value::Null);
        Ok(streaming_info_to_platforms(&info))
    }
}

/// Fold one country's `streamingInfo` into a platform map.
///
/// Object entries are taken as-is; list entries use the first offer that
/// carries a `link`. Anything else is dropped.
pub fn streaming_info_to_platforms(info: &Value) -> PlatformMap {
    let Value::Object(services) = info else {
        return PlatformMap::new();
    };

    services
        .iter()
        .filter_map(|(service, entry)| {
            let availability = match entry {
                Value::Object(object) => PlatformAvailability::from_object(object.clone()),
                Value::Array(offers) => {
                    let offer = offers
                        .iter()
                        .filter_map(Value::as_object)
                        .find(|o| o.get("link").and_then(Value::as_str).is_some())?;
                    let mut object = offer.clone();
                    if let Some(link) = object.remove("link") {
                        object.insert("url".to_string(), link);
                    }
                    PlatformAvailability::from_object(object)
                }
                _ => return None,
            };
            Some((service.to_lowercase(), availability))
        })
        .collect()
}
