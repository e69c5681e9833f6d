// Dashboard service - Use case for building chart payloads from the poller
use crate::application::metrics_poller::MetricsPoller;
use crate::domain::dashboard::{Dashboard, LineChart, PolarChart, PolarSegment};
use crate::domain::metrics::{MetricKind, MetricSeries, SummarySnapshot};
use std::sync::Arc;

const DASHBOARD_TITLE: &str = "Rainwater Harvesting System Dashboard";

// Label, metric, fill and border of each polar segment. Turbine speed has no segment.
const POLAR_SEGMENTS: [(&str, MetricKind, &str, &str); 4] = [
    (
        "Water Level",
        MetricKind::WaterLevel,
        "rgba(0,123,255,0.6)",
        "rgba(0,123,255,1)",
    ),
    (
        "Water Flow",
        MetricKind::WaterFlow,
        "rgb(255, 99, 132)",
        "rgba(255,99,132,1)",
    ),
    (
        "Electricity Generated",
        MetricKind::ElectricityGenerated,
        "rgba(255,206,86,0.6)",
        "rgba(54,162,235,1)",
    ),
    (
        "Battery storage",
        MetricKind::BatteryStorage,
        "rgba(153,102,255,0.6)",
        "rgba(255,206,86,1)",
    ),
];

#[derive(Clone)]
pub struct DashboardService {
    poller: Arc<MetricsPoller>,
}

impl DashboardService {
    pub fn new(poller: Arc<MetricsPoller>) -> Self {
        Self { poller }
    }

    pub async fn get_dashboard(&self) -> Dashboard {
        let series = self.poller.series().await;
        let status = self.poller.status().await;
        let interval = self.poller.interval_seconds();

        Dashboard::new(
            DASHBOARD_TITLE.to_string(),
            status.elapsed_seconds,
            interval,
            status.stale,
            line_charts(&series, interval),
            polar_chart(&series.summary()),
        )
    }
}

/// Elapsed-time label for every sample, `index * interval`
pub fn x_labels(samples: usize, interval_seconds: u64) -> Vec<u64> {
    (0..samples as u64).map(|i| i * interval_seconds).collect()
}

fn line_charts(series: &MetricSeries, interval_seconds: u64) -> Vec<LineChart> {
    let labels = x_labels(series.len(), interval_seconds);
    MetricKind::ALL
        .iter()
        .map(|kind| LineChart::new(*kind, labels.clone(), series.values(*kind).to_vec()))
        .collect()
}

fn polar_chart(summary: &SummarySnapshot) -> PolarChart {
    let segments = POLAR_SEGMENTS
        .iter()
        .map(|(label, kind, background, border)| {
            PolarSegment::new(label, summary.value(*kind), background, border)
        })
        .collect();
    PolarChart::new(segments)
}
