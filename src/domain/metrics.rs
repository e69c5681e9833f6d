// Metric domain models
use serde::{Deserialize, Serialize};

/// The five metrics reported by the prediction endpoint, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    WaterLevel,
    WaterFlow,
    TurbineSpeed,
    ElectricityGenerated,
    BatteryStorage,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::WaterLevel,
        MetricKind::WaterFlow,
        MetricKind::TurbineSpeed,
        MetricKind::ElectricityGenerated,
        MetricKind::BatteryStorage,
    ];

    /// Key used on the wire and as the chart id
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::WaterLevel => "waterLevel",
            MetricKind::WaterFlow => "waterFlow",
            MetricKind::TurbineSpeed => "turbineSpeed",
            MetricKind::ElectricityGenerated => "electricityGenerated",
            MetricKind::BatteryStorage => "batterystorage",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::WaterLevel => "Water Level",
            MetricKind::WaterFlow => "Water Flow Speed",
            MetricKind::TurbineSpeed => "Turbine Speed",
            MetricKind::ElectricityGenerated => "Electricity Generated",
            MetricKind::BatteryStorage => "Battery Storage",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::WaterLevel => "cm",
            MetricKind::WaterFlow => "m/s",
            MetricKind::TurbineSpeed => "RPM",
            MetricKind::ElectricityGenerated | MetricKind::BatteryStorage => "W",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MetricKind::WaterLevel => "rgba(0,123,255,1)",
            MetricKind::WaterFlow => "rgba(255,99,132,1)",
            MetricKind::TurbineSpeed => "rgba(54,162,235,1)",
            MetricKind::ElectricityGenerated => "rgba(255,206,86,1)",
            MetricKind::BatteryStorage => "rgba(153,102,255,1)",
        }
    }
}

/// One response from the prediction endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub water_level: f64,
    pub water_flow: f64,
    pub turbine_speed: f64,
    pub electricity_generated: f64,
    // The endpoint spells this key in lowercase
    #[serde(rename = "batterystorage", alias = "batteryStorage")]
    pub battery_storage: f64,
}

impl MetricSnapshot {
    pub fn new(
        water_level: f64,
        water_flow: f64,
        turbine_speed: f64,
        electricity_generated: f64,
        battery_storage: f64,
    ) -> Self {
        Self {
            water_level,
            water_flow,
            turbine_speed,
            electricity_generated,
            battery_storage,
        }
    }

    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::WaterLevel => self.water_level,
            MetricKind::WaterFlow => self.water_flow,
            MetricKind::TurbineSpeed => self.turbine_speed,
            MetricKind::ElectricityGenerated => self.electricity_generated,
            MetricKind::BatteryStorage => self.battery_storage,
        }
    }
}

/// Latest value of every series, zero for a series with no samples yet.
///
/// Derived from [`MetricSeries`] on every read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySnapshot {
    pub water_level: f64,
    pub water_flow: f64,
    pub turbine_speed: f64,
    pub electricity_generated: f64,
    #[serde(rename = "batterystorage")]
    pub battery_storage: f64,
}

impl SummarySnapshot {
    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::WaterLevel => self.water_level,
            MetricKind::WaterFlow => self.water_flow,
            MetricKind::TurbineSpeed => self.turbine_speed,
            MetricKind::ElectricityGenerated => self.electricity_generated,
            MetricKind::BatteryStorage => self.battery_storage,
        }
    }
}

/// Append-only history of all five metrics.
///
/// Every series always has the same length: a snapshot is appended to all
/// five or to none. Index `i` is the `i`-th successful poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    water_level: Vec<f64>,
    water_flow: Vec<f64>,
    turbine_speed: Vec<f64>,
    electricity_generated: Vec<f64>,
    #[serde(rename = "batterystorage")]
    battery_storage: Vec<f64>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: &MetricSnapshot) {
        self.water_level.push(snapshot.water_level);
        self.water_flow.push(snapshot.water_flow);
        self.turbine_speed.push(snapshot.turbine_speed);
        self.electricity_generated
            .push(snapshot.electricity_generated);
        self.battery_storage.push(snapshot.battery_storage);
    }

    pub fn len(&self) -> usize {
        self.water_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.water_level.is_empty()
    }

    pub fn values(&self, kind: MetricKind) -> &[f64] {
        match kind {
            MetricKind::WaterLevel => &self.water_level,
            MetricKind::WaterFlow => &self.water_flow,
            MetricKind::TurbineSpeed => &self.turbine_speed,
            MetricKind::ElectricityGenerated => &self.electricity_generated,
            MetricKind::BatteryStorage => &self.battery_storage,
        }
    }

    pub fn last(&self, kind: MetricKind) -> Option<f64> {
        self.values(kind).last().copied()
    }

    pub fn summary(&self) -> SummarySnapshot {
        let latest = |kind| self.last(kind).unwrap_or_default();
        SummarySnapshot {
            water_level: latest(MetricKind::WaterLevel),
            water_flow: latest(MetricKind::WaterFlow),
            turbine_speed: latest(MetricKind::TurbineSpeed),
            electricity_generated: latest(MetricKind::ElectricityGenerated),
            battery_storage: latest(MetricKind::BatteryStorage),
        }
    }
}
