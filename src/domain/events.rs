// Change notifications broadcast to dashboard views
use super::metrics::MetricSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DashboardEvent {
    /// The timer fired, whether or not a fetch was started
    Tick { elapsed_seconds: u64 },
    /// A snapshot was appended at `index` in every series
    Snapshot {
        index: usize,
        elapsed_seconds: u64,
        received_at: DateTime<Utc>,
        snapshot: MetricSnapshot,
    },
    FetchFailed { elapsed_seconds: u64, error: String },
}
