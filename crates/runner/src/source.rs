//! Where the feed document comes from.

use std::path::PathBuf;
use std::time::Duration;

use svitlo_core::FeedDocument;

use crate::error::FeedError;

/// Retrieves the current feed document.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<FeedDocument, FeedError>;

    /// Where the feed is read from, for log lines.
    fn describe(&self) -> String;
}

/// Fetches the feed over HTTP(S) with a per-request timeout.
#[derive(Debug)]
pub struct HttpFeedSource {
    url: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<FeedDocument, FeedError> {
        let start = std::time::Instant::now();
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let doc = serde_json::from_str(&body)?;
        tracing::info!(
            url = %self.url,
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Feed fetched"
        );
        Ok(doc)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the feed from a local JSON file.
#[derive(Debug)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl FeedSource for FileFeedSource {
    async fn fetch(&self) -> Result<FeedDocument, FeedError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
