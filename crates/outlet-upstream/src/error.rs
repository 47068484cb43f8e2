use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`crate::UpstreamClient`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network, TLS, or body-read failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: StatusCode, url: String },

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The outlet payload was JSON but not an outlet list.
    #[error("unexpected outlet payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: outlet_core::CoreError,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl UpstreamError {
    /// The upstream HTTP status, when the failure was a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
