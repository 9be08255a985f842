//! Notifier trait definition and shared error types.

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Channel API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Payload {part}/{parts} not delivered: {source}")]
    Undelivered {
        part: usize,
        parts: usize,
        #[source]
        source: Box<NotifyError>,
    },
}

/// One payload ready for delivery.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    /// Plain-text message body.
    pub body: String,
    /// 1-based position of this payload within the run.
    pub part: usize,
    /// Number of payloads in the run.
    pub parts: usize,
}

impl Notification {
    /// A single, standalone payload.
    pub fn single(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            part: 1,
            parts: 1,
        }
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "telegram").
    fn channel_name(&self) -> &str;
}

/// Result of delivering one payload.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    pub part: usize,
    pub duration_ms: u64,
}
