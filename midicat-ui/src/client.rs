//! Catalog service HTTP client
//!
//! Thin typed wrapper over the two catalog endpoints. Response bodies
//! go through [`midicat_common::records`] so the loose wire shapes
//! never leak past this module.

use std::time::Duration;

use thiserror::Error;

use midicat_common::records::{self, RawSearchHit, ResultRecord};
use midicat_common::QueryDescriptor;

const USER_AGENT: &str = "midicat/0.1.0 (https://github.com/midicat/midicat)";

/// Catalog client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// HTTP client for the catalog service
#[derive(Clone)]
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the service at `base_url`
    ///
    /// A trailing slash on the base URL is tolerated.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch autocomplete suggestions for a text prefix
    pub async fn autocomplete(&self, text: &str) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/autocomplete", self.base_url);

        tracing::debug!(text = %text, "Querying catalog autocomplete");

        let response = self
            .http_client
            .get(&url)
            .query(&[("query", text)])
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError(status.as_u16(), error_text));
        }

        let suggestions: Vec<String> = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        tracing::debug!(count = suggestions.len(), "Retrieved autocomplete suggestions");

        Ok(suggestions)
    }

    /// Execute the search described by `descriptor`
    ///
    /// Hits are normalized before being returned, so callers only ever
    /// see [`ResultRecord`] values.
    pub async fn search(
        &self,
        descriptor: &QueryDescriptor,
    ) -> Result<Vec<ResultRecord>, ClientError> {
        let url = format!("{}/search", self.base_url);

        tracing::debug!(text = ?descriptor.text, "Querying catalog search");

        let response = self
            .http_client
            .get(&url)
            .query(&descriptor.query_pairs())
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError(status.as_u16(), error_text));
        }

        let hits: Vec<RawSearchHit> = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        tracing::info!(count = hits.len(), "Retrieved search results");

        Ok(hits.into_iter().map(records::normalize).collect())
    }
}
