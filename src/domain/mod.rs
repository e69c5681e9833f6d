// Domain layer - Metric series and dashboard models
pub mod dashboard;
pub mod events;
pub mod metrics;
