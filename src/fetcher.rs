use crate::types::{DigestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Seam for fetching a location's listing page, so the extractor can be
/// exercised against canned HTML in tests.
#[async_trait]
pub trait FetchPage: Send + Sync {
    /// Fetch the page body. Non-2xx responses and transport failures are
    /// both `Fetch` errors; the caller decides how far they propagate.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("EventDigest/1.0 (event notification service)")
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchPage for PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching listing page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DigestError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Fetch {
                url: url.to_string(),
                reason: format!(
                    "HTTP {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let body = response.text().await.map_err(|e| DigestError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
