// Application layer - Use cases and ports
pub mod dashboard_service;
pub mod metrics_poller;
pub mod prediction_source;
