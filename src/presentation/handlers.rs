// HTTP request handlers
use crate::application::dashboard_service::x_labels;
use crate::domain::metrics::MetricSeries;
use crate::infrastructure::event_stream::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Router,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    pub interval_seconds: u64,
    pub elapsed_seconds: u64,
    pub labels: Vec<u64>,
    pub series: MetricSeries,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/status", get(poller_status))
        .route("/metrics/series", get(metric_series))
        .route("/metrics/latest", get(latest_snapshot))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn respond(result: Result<Response, axum::http::StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn poller_status(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let status = state.poller.status().await;
    respond(json_response(&status, accepts_brotli(&headers)).await)
}

/// Full history of every metric, for line charts
pub async fn metric_series(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let series = state.poller.series().await;
    let interval_seconds = state.poller.interval_seconds();
    let body = SeriesResponse {
        interval_seconds,
        elapsed_seconds: state.poller.elapsed_time().await,
        labels: x_labels(series.len(), interval_seconds),
        series,
    };
    respond(json_response(&body, accepts_brotli(&headers)).await)
}

/// Latest value of every metric, zero before the first successful poll
pub async fn latest_snapshot(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let summary = state.poller.latest_snapshot().await;
    respond(json_response(&summary, accepts_brotli(&headers)).await)
}

pub async fn dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let dashboard = state.dashboard_service.get_dashboard().await;
    respond(json_response(&dashboard, accepts_brotli(&headers)).await)
}

/// Live dashboard events (NDJSON)
pub async fn stream_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_receiver(state.poller.subscribe(), state.shutdown.clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::metrics_poller::MetricsPoller;
    use crate::application::prediction_source::{FetchError, PredictionSource};
    use crate::domain::metrics::MetricSnapshot;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    struct FixedSource(MetricSnapshot);

    #[async_trait]
    impl PredictionSource for FixedSource {
        async fn fetch_snapshot(&self) -> Result<MetricSnapshot, FetchError> {
            Ok(self.0)
        }
    }

    struct DownSource;

    #[async_trait]
    impl PredictionSource for DownSource {
        async fn fetch_snapshot(&self) -> Result<MetricSnapshot, FetchError> {
            Err(FetchError::Network("connection refused".to_string()))
        }
    }

    fn setup_state(source: Arc<dyn PredictionSource>) -> Arc<AppState> {
        let poller = Arc::new(MetricsPoller::new(source, Duration::from_secs(5), 16));
        Arc::new(AppState::new(poller, CancellationToken::new()))
    }

    async fn get_json(state: Arc<AppState>, uri: &str) -> serde_json::Value {
        let response = build_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let state = setup_state(Arc::new(DownSource));
        let response = build_router(state)
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_latest_is_zero_before_first_poll() {
        let state = setup_state(Arc::new(DownSource));
        let json = get_json(state, "/metrics/latest").await;
        assert_eq!(json["waterLevel"], 0.0);
        assert_eq!(json["batterystorage"], 0.0);
    }

    #[tokio::test]
    async fn test_series_returns_history_with_labels() {
        let state = setup_state(Arc::new(FixedSource(MetricSnapshot::new(
            1.0, 2.0, 3.0, 4.0, 5.0,
        ))));
        state.poller.poll_once().await.unwrap();
        state.poller.poll_once().await.unwrap();

        let json = get_json(state, "/metrics/series").await;
        assert_eq!(json["intervalSeconds"], 5);
        assert_eq!(json["labels"], serde_json::json!([0, 5]));
        assert_eq!(json["series"]["turbineSpeed"], serde_json::json!([3.0, 3.0]));
    }

    #[tokio::test]
    async fn test_dashboard_contains_charts() {
        let state = setup_state(Arc::new(FixedSource(MetricSnapshot::new(
            10.0, 20.0, 30.0, 40.0, 50.0,
        ))));
        state.poller.poll_once().await.unwrap();

        let json = get_json(state, "/dashboard").await;
        assert_eq!(json["title"], "Rainwater Harvesting System Dashboard");
        assert_eq!(json["lineCharts"].as_array().unwrap().len(), 5);
        assert_eq!(json["lineCharts"][0]["latest"], 10.0);
        assert_eq!(json["polarChart"]["segments"].as_array().unwrap().len(), 4);
        assert_eq!(json["stale"], false);
    }

    #[tokio::test]
    async fn test_status_reports_stale_after_failure() {
        let state = setup_state(Arc::new(DownSource));
        assert!(state.poller.poll_once().await.is_err());

        let json = get_json(state, "/status").await;
        assert_eq!(json["stale"], true);
        assert_eq!(json["consecutiveFailures"], 1);
        assert_eq!(json["samples"], 0);
    }

    #[tokio::test]
    async fn test_brotli_requested_is_honoured() {
        let state = setup_state(Arc::new(DownSource));
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .header(header::ACCEPT_ENCODING, "gzip, br")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
    }

    #[tokio::test]
    async fn test_stream_uses_ndjson() {
        let state = setup_state(Arc::new(DownSource));
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/dashboard/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-ndjson");
    }
}
