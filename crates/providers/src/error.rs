//! Errors shared by the metadata provider clients.

use ottradar_core::error::CoreError;
use serde::de::DeserializeOwned;

/// Errors from the provider HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider's API key is not configured.
    #[error("{provider} API key is not configured")]
    MissingKey { provider: &'static str },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the JSON shape we expect.
    #[error("Unexpected {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        match err {
            ProviderError::MissingKey { provider } => CoreError::ProviderUnavailable { provider },
            ProviderError::Api { provider, .. } | ProviderError::Decode { provider, .. } => {
                CoreError::ProviderFailed { provider, message }
            }
            ProviderError::Request(_) => CoreError::ProviderFailed {
                provider: "HTTP",
                message,
            },
        }
    }
}

/// Return the response unchanged on a 2xx status, or [`ProviderError::Api`]
/// with the status and body text.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Check the status, then deserialize the body into `T`.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(provider, response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })
}
