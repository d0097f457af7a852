use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherToolsError {
    /// The bridge is missing configuration it needs to serve the request
    /// (most commonly: no API key). Surfaces on first use, not at startup, so
    /// liveness endpoints keep answering on a misconfigured deployment.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The upstream provider answered with a non-2xx status.
    #[error("API request failed: {code} - {body}")]
    UpstreamStatus { code: u16, body: String },

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Request error: {0}")]
    UpstreamTransport(String),

    /// Caller arguments violate the declared schema for the operation.
    #[error("Invalid parameters: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, WeatherToolsError>;

impl From<reqwest::Error> for WeatherToolsError {
    fn from(value: reqwest::Error) -> Self {
        Self::UpstreamTransport(value.to_string())
    }
}
