//! Upstream client for the WeatherAPI.com REST API.
//!
//! One authenticated GET per logical request. No retries, no backoff, no
//! caching; failures map onto the [`WeatherToolsError`] taxonomy and are left
//! for the protocol adapters to surface.

use crate::error::{Result, WeatherToolsError};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Thin wrapper over `reqwest` that appends the provider key to every call.
///
/// The inner client is built once and is safe to share across tasks. The API
/// key is optional at construction so a keyless deployment can still boot and
/// answer liveness checks; the missing key only fails the first actual call.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    /// Build a client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `WeatherToolsError::Config` if `base_url` does not parse or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| {
            WeatherToolsError::Config(format!("Invalid base URL '{base_url}': {e}"))
        })?;

        // Proxy settings inherited from the process environment (ALL_PROXY,
        // HTTPS_PROXY, ...) must never apply to upstream calls; container
        // hosts routinely set them for unrelated traffic.
        let http = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| WeatherToolsError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Whether an API key was supplied. Reported by the root descriptor; the
    /// key itself is never exposed.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Issue a single GET against `{base_url}/{endpoint}` with `params` plus
    /// the provider key.
    ///
    /// # Errors
    ///
    /// - `Config` if no API key is configured
    /// - `UpstreamStatus` on a non-2xx answer (status + body text)
    /// - `UpstreamTransport` on DNS/connect/timeout/decode failures
    pub async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherToolsError::Config("WEATHER_API_KEY is not set".to_string()))?;

        debug!(endpoint, "weatherapi request");

        let response = self
            .http
            .get(format!("{}/{endpoint}", self.base_url))
            .query(params)
            .query(&[("key", key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(WeatherToolsError::UpstreamStatus {
                code: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
