//! HTTP client for the upstream outlet service.
//!
//! The upstream exposes two JSON endpoints under a configurable base URL:
//! `GET <base>/outlets` and `GET <base>/search?query=...`. This client only
//! forwards requests and classifies failures; it does not retry.

use std::time::Duration;

use outlet_core::OutletSnapshot;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use crate::error::UpstreamError;

/// Characters left unescaped in query values, matching `encodeURIComponent`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Client for the upstream outlet data/search service.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// A path on the base URL is kept: `http://host/api` resolves outlets at
    /// `http://host/api/outlets`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`UpstreamError::Http`] if the `reqwest::Client`
    /// cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joins append instead of replacing the
        // last path segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| UpstreamError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UpstreamError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the raw outlet list from `<base>/outlets`.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Status`] on a non-2xx response.
    /// - [`UpstreamError::Http`] on network failure.
    /// - [`UpstreamError::Deserialize`] if the body is not JSON.
    pub async fn fetch_outlets(&self) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint_url("outlets", None)?;
        self.request_json(url).await
    }

    /// Fetches `<base>/outlets` and decodes it into an [`OutletSnapshot`].
    ///
    /// # Errors
    ///
    /// Everything [`UpstreamClient::fetch_outlets`] returns, plus
    /// [`UpstreamError::Payload`] if the body is not a JSON array.
    pub async fn fetch_snapshot(&self) -> Result<OutletSnapshot, UpstreamError> {
        let payload = self.fetch_outlets().await?;
        let snapshot = OutletSnapshot::from_json(payload).map_err(|source| UpstreamError::Payload {
            url: self.base_url.to_string(),
            source,
        })?;
        if snapshot.skipped() > 0 || snapshot.unlocated() > 0 {
            tracing::warn!(
                kept = snapshot.len(),
                skipped = snapshot.skipped(),
                unlocated = snapshot.unlocated(),
                "outlet snapshot contains malformed records"
            );
        }
        Ok(snapshot)
    }

    /// Runs a free-text search against `<base>/search?query=<query>`.
    ///
    /// The payload is returned untouched; see
    /// [`outlet_core::normalize_search_results`] for the canonical shape.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Status`] on a non-2xx response.
    /// - [`UpstreamError::Http`] on network failure.
    /// - [`UpstreamError::Deserialize`] if the body is not JSON.
    pub async fn search(&self, query: &str) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint_url("search", Some(query))?;
        self.request_json(url).await
    }

    /// Resolves `path` against the base URL, with an optional `query` parameter.
    pub(crate) fn endpoint_url(&self, path: &str, query: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| UpstreamError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if let Some(query) = query {
            let encoded = utf8_percent_encode(query, QUERY_VALUE);
            url.set_query(Some(&format!("query={encoded}")));
        }
        Ok(url)
    }

    async fn request_json(&self, url: Url) -> Result<serde_json::Value, UpstreamError> {
        tracing::debug!(url = %url, "forwarding request upstream");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| UpstreamError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
