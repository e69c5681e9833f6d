// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod event_stream;
pub mod http_response;
pub mod prediction_client;
