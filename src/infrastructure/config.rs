use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://rainwaterharvesting.onrender.com/predict";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_INTERVAL_SECONDS: i64 = 5;
const DEFAULT_EVENT_CAPACITY: i64 = 64;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub poller: PollerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollerSettings {
    pub endpoint: String,
    pub interval_seconds: u64,
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    pub event_capacity: usize,
}

impl PollerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl DashboardConfig {
    fn validate(self) -> anyhow::Result<Self> {
        if self.poller.interval_seconds == 0 {
            anyhow::bail!("poller.interval_seconds must be greater than zero");
        }
        reqwest::Url::parse(&self.poller.endpoint).map_err(|e| {
            anyhow::anyhow!("poller.endpoint {:?} is not a valid URL: {}", self.poller.endpoint, e)
        })?;
        Ok(self)
    }
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind_address", DEFAULT_BIND_ADDRESS)?
        .set_default("poller.endpoint", DEFAULT_ENDPOINT)?
        .set_default("poller.interval_seconds", DEFAULT_INTERVAL_SECONDS)?
        .set_default("poller.event_capacity", DEFAULT_EVENT_CAPACITY)?)
}

// `vars` replaces the process environment when set
fn environment(vars: Option<config::Map<String, String>>) -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .source(vars)
}

/// Load `config/dashboard.*` (optional) with `DASHBOARD_*` environment overrides,
/// e.g. `DASHBOARD_POLLER__INTERVAL_SECONDS=10`
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(environment(None))
        .build()?;

    settings.try_deserialize::<DashboardConfig>()?.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn load_from_toml(toml: &str) -> anyhow::Result<DashboardConfig> {
        let settings = with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        settings.try_deserialize::<DashboardConfig>()?.validate()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_from_toml("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.poller.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.poller.interval(), Duration::from_secs(5));
        assert_eq!(config.poller.request_timeout(), None);
        assert_eq!(config.poller.event_capacity, 64);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = load_from_toml(
            r#"
            [poller]
            endpoint = "http://localhost:9000/predict"
            interval_seconds = 10
            request_timeout_seconds = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.poller.endpoint, "http://localhost:9000/predict");
        assert_eq!(config.poller.interval_seconds, 10);
        assert_eq!(config.poller.request_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_environment_overrides_file() {
        let vars = [
            ("DASHBOARD_POLLER__INTERVAL_SECONDS", "10"),
            ("DASHBOARD_SERVER__BIND_ADDRESS", "127.0.0.1:9090"),
            ("OTHER_POLLER__INTERVAL_SECONDS", "99"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = with_defaults()
            .unwrap()
            .add_source(File::from_str("[poller]\ninterval_seconds = 7\n", FileFormat::Toml))
            .add_source(environment(Some(vars)))
            .build()
            .unwrap();
        let config = settings.try_deserialize::<DashboardConfig>().unwrap().validate().unwrap();

        assert_eq!(config.poller.interval_seconds, 10);
        assert_eq!(config.server.bind_address, "127.0.0.1:9090");
        assert_eq!(config.poller.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = load_from_toml("[poller]\ninterval_seconds = 0\n").unwrap_err();
        assert!(err.to_string().contains("interval_seconds"));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = load_from_toml("[poller]\nendpoint = \"not a url\"\n").unwrap_err();
        assert!(err.to_string().contains("not a valid URL"));
    }
}
