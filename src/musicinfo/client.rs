//! Metadata provider HTTP client
//!
//! Issues one `GET <base_url>?group=<group>&song=<title>` per lookup and
//! parses the JSON body. No retries and no caching: a failed lookup is
//! reported once and the caller decides what to do with it.
//!
//! Every request is bounded by an explicit timeout. Dropping the returned
//! future cancels the in-flight request.

use std::time::Duration;

use super::{adapter, dto};
use super::domain::{ProviderError, SongDetail};
use crate::config::ProviderConfig;

/// Metadata provider API client
#[derive(Debug, Clone)]
pub struct MusicInfoClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl MusicInfoClient {
    /// Create a client whose whole request (connect + body) is bounded by `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_timeouts(base_url, timeout, timeout)
    }

    /// Create a client with separate overall and connect timeouts
    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .connect_timeout(connect_timeout.min(timeout))
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Build a client from configuration.
    ///
    /// Returns `Ok(None)` when no provider URL is configured.
    pub fn from_config(config: &ProviderConfig) -> Result<Option<Self>, ProviderError> {
        let Some(base_url) = config.base_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };
        Self::with_timeouts(
            base_url,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
        .map(Some)
    }

    /// Look up enrichment data for a song
    pub async fn song_detail(&self, group: &str, title: &str) -> Result<SongDetail, ProviderError> {
        let response = self.send_detail_request(group, title).await?;
        Ok(adapter::to_song_detail(response))
    }

    fn request_url(&self, group: &str, title: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}group={}&song={}",
            self.base_url,
            separator,
            urlencoding::encode(group),
            urlencoding::encode(title)
        )
    }

    /// Send the HTTP request and parse the response
    async fn send_detail_request(
        &self,
        group: &str,
        title: &str,
    ) -> Result<dto::SongDetailResponse, ProviderError> {
        let url = self.request_url(group, title);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadResponse(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response.json::<dto::SongDetailResponse>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                ProviderError::BadResponse(format!("failed to parse response: {e}"))
            }
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Unavailable(format!("request timed out after {:?}", self.timeout))
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }
}
