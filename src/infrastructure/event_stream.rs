// Newline-delimited JSON streaming of dashboard events
use crate::domain::events::DashboardEvent;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_util::sync::CancellationToken;

/// Create a chunked NDJSON streaming response, one event per line
pub async fn ndjson_event_stream<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = DashboardEvent> + Send + 'static,
{
    let byte_stream = stream.map(|event| serialize_line(&event));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn serialize_line(event: &DashboardEvent) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(event)?;
    let mut line = BytesMut::with_capacity(json.len() + 1);
    line.put_slice(&json);
    line.put_u8(b'\n');
    Ok(line.freeze())
}

/// Helper to create a streaming response from a poller subscription.
/// Events missed by a lagging client are skipped. The stream ends on shutdown.
pub async fn stream_from_receiver(
    rx: broadcast::Receiver<DashboardEvent>,
    shutdown: CancellationToken,
) -> impl IntoResponse {
    let stream = BroadcastStream::new(rx)
        .filter_map(|item| async move {
            match item {
                Ok(event) => Some(event),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dashboard stream client lagged behind");
                    None
                }
            }
        })
        .take_until(shutdown.cancelled_owned());

    match ndjson_event_stream(stream).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_are_newline_delimited() {
        let events = vec![
            DashboardEvent::Tick { elapsed_seconds: 5 },
            DashboardEvent::FetchFailed {
                elapsed_seconds: 5,
                error: "connection refused".to_string(),
            },
        ];
        let response = ndjson_event_stream(futures::stream::iter(events))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-ndjson");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "tick");
        assert_eq!(lines[1]["type"], "fetchFailed");
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_stream_ends_when_sender_dropped() {
        let (tx, rx) = broadcast::channel(4);
        let response = stream_from_receiver(rx, CancellationToken::new())
            .await
            .into_response();
        tx.send(DashboardEvent::Tick { elapsed_seconds: 10 }).unwrap();
        drop(tx);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text, "{\"type\":\"tick\",\"elapsedSeconds\":10}\n");
    }

    #[tokio::test]
    async fn test_stream_ends_on_shutdown() {
        let (tx, rx) = broadcast::channel::<DashboardEvent>(4);
        let shutdown = CancellationToken::new();
        let response = stream_from_receiver(rx, shutdown.clone())
            .await
            .into_response();
        shutdown.cancel();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
        drop(tx);
    }
}
