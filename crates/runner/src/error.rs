use thiserror::Error;

/// Feed retrieval failures.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Revision marker persistence failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("marker IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a run ended without committing a new revision.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("feed unavailable: {0}")]
    FeedUnavailable(#[from] FeedError),

    #[error("revision marker: {0}")]
    Store(#[from] StoreError),

    #[error("report rendering failed: {0}")]
    Report(#[from] svitlo_report::ReportError),

    #[error("delivery failed: {0}")]
    DeliveryFailure(#[from] svitlo_notify::NotifyError),
}
