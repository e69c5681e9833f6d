// Port for fetching metric snapshots from the prediction endpoint
use crate::domain::metrics::MetricSnapshot;
use async_trait::async_trait;

/// Why a single poll produced no snapshot
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be completed
    #[error("Request to prediction endpoint failed: {0}")]
    Network(String),

    #[error("Prediction endpoint returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body is not a well-formed snapshot
    #[error("Failed to parse prediction response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Fetch the current snapshot of all five metrics
    async fn fetch_snapshot(&self) -> Result<MetricSnapshot, FetchError>;
}
