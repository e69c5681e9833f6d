// HTTP prediction endpoint client
use crate::application::prediction_source::{FetchError, PredictionSource};
use crate::domain::metrics::MetricSnapshot;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpPredictionSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionSource {
    pub fn new(endpoint: String, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Parse a response body into a snapshot
pub fn parse_snapshot(body: &str) -> Result<MetricSnapshot, FetchError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl PredictionSource for HttpPredictionSource {
    async fn fetch_snapshot(&self) -> Result<MetricSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let snapshot = parse_snapshot(&body)?;
        tracing::debug!(?snapshot, "Prediction response");
        Ok(snapshot)
    }
}
