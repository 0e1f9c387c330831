//! Generic JSON-over-HTTP source adapter.
//!
//! Fetches `{base_url}/{seed}` and expects a [`SourceRecord`] serialized as
//! JSON. Site-specific scraping lives behind such endpoints; this adapter
//! only maps transport outcomes onto [`SourceError`] classes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SourceAdapter, SourceError};
use crate::record::SourceRecord;

/// Configuration for one HTTP-backed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// Source name referenced from the source lists.
    pub name: String,
    /// Endpoint prefix; the url-encoded seed is appended as a path segment.
    pub base_url: String,
    /// Whether the endpoint retries upstream itself.
    #[serde(default)]
    pub self_retrying: bool,
    /// Client-side request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

/// Source adapter backed by a JSON endpoint.
pub struct HttpSourceAdapter {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpSourceAdapter {
    /// Create a new adapter.
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Unclassified(format!("failed to build client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url_for(&self, seed: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(seed)
        )
    }
}

/// Map a non-success status onto a failure class.
pub(crate) fn classify_status(status: StatusCode, seed: &str) -> Option<SourceError> {
    if status.is_success() {
        return None;
    }

    let err = match status.as_u16() {
        404 => SourceError::NotFound(seed.to_string()),
        409 => SourceError::DuplicateTarget(seed.to_string()),
        401 | 403 => SourceError::AccessDenied(format!("HTTP {}", status.as_u16())),
        408 | 429 => SourceError::TransientNetwork(format!("HTTP {}", status.as_u16())),
        s if s >= 500 => SourceError::TransientNetwork(format!("HTTP {}", s)),
        s => SourceError::Unclassified(format!("HTTP {}", s)),
    };
    Some(err)
}

fn classify_transport(err: reqwest::Error) -> SourceError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        SourceError::TransientNetwork(err.to_string())
    } else {
        SourceError::Unclassified(err.to_string())
    }
}

#[async_trait]
impl SourceAdapter for HttpSourceAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn self_retrying(&self) -> bool {
        self.config.self_retrying
    }

    async fn extract(&self, seed: &str, record: &mut SourceRecord) -> Result<(), SourceError> {
        let url = self.url_for(seed);
        debug!(source = %self.config.name, %url, "Fetching source record");

        let response = self.client.get(&url).send().await.map_err(classify_transport)?;

        if let Some(err) = classify_status(response.status(), seed) {
            return Err(err);
        }

        let fetched: SourceRecord = response.json().await.map_err(|e| {
            if e.is_decode() {
                SourceError::Unclassified(format!("failed to parse record: {}", e))
            } else {
                classify_transport(e)
            }
        })?;

        record.fill_from(fetched);
        Ok(())
    }
}
