//! Document fetching behind a capability trait
//!
//! Downloading and format parsing are external collaborators; the pipeline
//! only requires plain extracted text per logical document. The bundled HTTP
//! implementation stages the download in a temporary directory (where format
//! parsers operate) and releases it on every exit path.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{Error, Result};

/// Capability for turning a source locator into plain document text
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch and extract the text of the document at `source`
    async fn fetch_text(&self, source: &str) -> Result<String>;
}

/// HTTP fetcher that downloads the source and reads it as plain text
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    /// Create a fetcher with the given per-request timeout
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch_text(&self, source: &str) -> Result<String> {
        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| Error::fetch(source, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::fetch(
                source,
                format!("HTTP {}", response.status()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch(source, e.to_string()))?;

        // Stage the raw download on disk the way a format parser would
        // consume it, then extract and release the staging directory.
        let staging = tempfile::tempdir()?;
        let staged_path = staging.path().join("document");
        tokio::fs::write(&staged_path, &body).await?;

        let bytes = tokio::fs::read(&staged_path).await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        if let Err(e) = staging.close() {
            tracing::warn!("Failed to remove staging directory: {}", e);
        }

        tracing::debug!("Fetched {} chars from {}", text.chars().count(), source);
        Ok(text)
    }
}
