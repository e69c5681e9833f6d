// Metrics poller - Fixed-interval polling of the prediction endpoint
use crate::application::prediction_source::{FetchError, PredictionSource};
use crate::domain::events::DashboardEvent;
use crate::domain::metrics::{MetricSeries, MetricSnapshot, SummarySnapshot};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Poller health as shown to views
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollerStatus {
    pub running: bool,
    pub elapsed_seconds: u64,
    pub interval_seconds: u64,
    pub samples: usize,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    /// True when the most recent completed fetch failed
    pub stale: bool,
}

#[derive(Debug, Default)]
struct PollerState {
    series: MetricSeries,
    elapsed_seconds: u64,
    running: bool,
    // Bumped on every start, stop and scheduled fetch. Only a fetch carrying
    // the current generation may apply its response.
    generation: u64,
    timer: Option<CancellationToken>,
    fetch: Option<AbortHandle>,
    consecutive_failures: u32,
    last_error: Option<String>,
}

/// Polls a [`PredictionSource`] on a fixed interval and accumulates the
/// returned snapshots into a [`MetricSeries`].
///
/// At most one fetch is in flight at a time. Each tick cancels a fetch that
/// is still outstanding and starts a fresh one, so a hung request never
/// holds up later ticks and responses are applied in request order.
/// [`MetricsPoller::stop`] cancels the outstanding fetch as well.
///
/// The interval is counted in whole seconds. A zero or fractional interval is
/// rounded up to the next whole second.
pub struct MetricsPoller {
    source: Arc<dyn PredictionSource>,
    interval: Duration,
    state: RwLock<PollerState>,
    events: broadcast::Sender<DashboardEvent>,
}

impl MetricsPoller {
    pub fn new(source: Arc<dyn PredictionSource>, interval: Duration, event_capacity: usize) -> Self {
        let interval_seconds =
            (interval.as_secs() + u64::from(interval.subsec_nanos() > 0)).max(1);
        if Duration::from_secs(interval_seconds) != interval {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                interval_seconds,
                "Poll interval rounded up to whole seconds"
            );
        }

        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            source,
            interval: Duration::from_secs(interval_seconds),
            state: RwLock::new(PollerState::default()),
            events,
        }
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval.as_secs()
    }

    /// Start the timer task. The first tick fires one interval from now.
    pub async fn start(self: &Arc<Self>) {
        let token = CancellationToken::new();
        {
            let mut state = self.state.write().await;
            if state.running {
                tracing::warn!("Metrics poller is already running");
                return;
            }
            state.running = true;
            state.generation += 1;
            state.timer = Some(token.clone());
        }

        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            "Metrics poller started"
        );

        let poller = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + poller.interval, poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        poller.tick().await;
                    }
                    _ = token.cancelled() => {
                        tracing::debug!("Metrics poller timer cancelled");
                        break;
                    }
                }
            }
        });
    }

    /// Stop ticking and cancel the fetch in flight, if any
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if !state.running {
            return;
        }
        state.running = false;
        state.generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
        if let Some(fetch) = state.fetch.take() {
            fetch.abort();
        }
        tracing::info!(
            elapsed_seconds = state.elapsed_seconds,
            samples = state.series.len(),
            "Metrics poller stopped"
        );
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }

    /// One timer firing. Returns the handle of the spawned fetch, or `None`
    /// while stopped.
    pub async fn tick(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut state = self.state.write().await;
        if !state.running {
            return None;
        }
        state.elapsed_seconds += self.interval.as_secs();
        let elapsed_seconds = state.elapsed_seconds;
        let _ = self.events.send(DashboardEvent::Tick { elapsed_seconds });

        if let Some(previous) = state.fetch.take() {
            if !previous.is_finished() {
                tracing::debug!(elapsed_seconds, "Previous fetch still in flight, cancelling it");
            }
            previous.abort();
        }

        state.generation += 1;
        let generation = state.generation;
        let poller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = poller.source.fetch_snapshot().await;
            // Failures are already logged and recorded in the status
            let _ = poller.record(Some(generation), result).await;
        });
        state.fetch = Some(handle.abort_handle());
        Some(handle)
    }

    /// Fetch one snapshot and append it, regardless of the timer state.
    pub async fn poll_once(&self) -> Result<MetricSnapshot, FetchError> {
        let result = self.source.fetch_snapshot().await;
        self.record(None, result).await
    }

    async fn record(
        &self,
        generation: Option<u64>,
        result: Result<MetricSnapshot, FetchError>,
    ) -> Result<MetricSnapshot, FetchError> {
        let mut state = self.state.write().await;

        if let Some(generation) = generation {
            if !state.running || state.generation != generation {
                tracing::debug!(generation, "Discarding superseded or late response");
                return result;
            }
        }

        let event = match &result {
            Ok(snapshot) => {
                state.series.push(snapshot);
                state.consecutive_failures = 0;
                state.last_error = None;
                tracing::debug!(samples = state.series.len(), "Appended prediction snapshot");
                DashboardEvent::Snapshot {
                    index: state.series.len() - 1,
                    elapsed_seconds: state.elapsed_seconds,
                    received_at: Utc::now(),
                    snapshot: *snapshot,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching prediction data");
                state.consecutive_failures += 1;
                state.last_error = Some(e.to_string());
                DashboardEvent::FetchFailed {
                    elapsed_seconds: state.elapsed_seconds,
                    error: e.to_string(),
                }
            }
        };
        drop(state);

        let _ = self.events.send(event);
        result
    }

    pub async fn latest_snapshot(&self) -> SummarySnapshot {
        self.state.read().await.series.summary()
    }

    pub async fn elapsed_time(&self) -> u64 {
        self.state.read().await.elapsed_seconds
    }

    pub async fn series(&self) -> MetricSeries {
        self.state.read().await.series.clone()
    }

    pub async fn status(&self) -> PollerStatus {
        let state = self.state.read().await;
        PollerStatus {
            running: state.running,
            elapsed_seconds: state.elapsed_seconds,
            interval_seconds: self.interval.as_secs(),
            samples: state.series.len(),
            consecutive_failures: state.consecutive_failures,
            last_error: state.last_error.clone(),
            stale: state.consecutive_failures > 0,
        }
    }

    /// Receive an event for every tick, appended snapshot and failed fetch
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }
}
