// Dashboard domain model
use super::metrics::MetricKind;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub elapsed_seconds: u64,
    pub interval_seconds: u64,
    pub stale: bool,
    pub line_charts: Vec<LineChart>,
    pub polar_chart: PolarChart,
}

impl Dashboard {
    pub fn new(
        title: String,
        elapsed_seconds: u64,
        interval_seconds: u64,
        stale: bool,
        line_charts: Vec<LineChart>,
        polar_chart: PolarChart,
    ) -> Self {
        Self {
            title,
            elapsed_seconds,
            interval_seconds,
            stale,
            line_charts,
            polar_chart,
        }
    }
}

/// History of one metric, x axis in elapsed seconds
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChart {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub color: String,
    pub labels: Vec<u64>,
    pub values: Vec<f64>,
    pub latest: Option<f64>,
}

impl LineChart {
    pub fn new(kind: MetricKind, labels: Vec<u64>, values: Vec<f64>) -> Self {
        let latest = values.last().copied();
        Self {
            id: kind.key().to_string(),
            title: kind.title().to_string(),
            unit: kind.unit().to_string(),
            color: kind.color().to_string(),
            labels,
            values,
            latest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarSegment {
    pub label: String,
    pub value: f64,
    pub background_color: String,
    pub border_color: String,
}

impl PolarSegment {
    pub fn new(label: &str, value: f64, background_color: &str, border_color: &str) -> Self {
        Self {
            label: label.to_string(),
            value,
            background_color: background_color.to_string(),
            border_color: border_color.to_string(),
        }
    }
}

/// Radial summary of the latest values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarChart {
    pub segments: Vec<PolarSegment>,
    pub border_width: u32,
}

impl PolarChart {
    pub fn new(segments: Vec<PolarSegment>) -> Self {
        Self {
            segments,
            border_width: 2,
        }
    }
}
