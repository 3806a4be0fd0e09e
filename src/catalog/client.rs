//! iTunes Search API HTTP client
//!
//! Two single-shot requests, no retries:
//! - `GET {base}/search?media=<type>&term=<percent-encoded term>`
//! - `GET <artwork URL>` for raw image bytes
//!
//! Timeouts are configured on the underlying reqwest client.

use std::time::Duration;

use super::{CatalogError, RawResultSet};
use crate::config::CatalogConfig;
use crate::model::MediaType;

/// Public catalog host.
pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com";

/// iTunes Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ItunesClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// The client accepts gzip-compressed responses and identifies itself
    /// with the crate name and version.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `[catalog]` config section.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Build the search URL for a media type and free-text term.
    pub fn search_url(&self, media_type: MediaType, term: &str) -> String {
        format!(
            "{}/search?media={}&term={}",
            self.base_url,
            media_type.as_str(),
            urlencoding::encode(term)
        )
    }

    /// Run a search and return the raw JSON payload.
    pub async fn search(
        &self,
        media_type: MediaType,
        term: &str,
    ) -> Result<RawResultSet, CatalogError> {
        let url = self.search_url(media_type, term);
        tracing::debug!(%url, "Searching catalog");

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let response = check_status(response)?;

        response
            .json::<RawResultSet>()
            .await
            .map_err(|e| CatalogError::Transport(format!("Unreadable search payload: {e}")))
    }

    /// Download raw bytes from an artwork URL.
    pub async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let response = check_status(response)?;

        let data = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?
            .to_vec();

        Ok(data)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %response.url(), %status, "Catalog request failed");
        return Err(CatalogError::Transport(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }
    Ok(response)
}
