// Rainwater harvesting dashboard - polls the prediction endpoint and serves chart data
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
