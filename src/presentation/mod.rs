// Presentation layer - HTTP routes and handler state
pub mod app_state;
pub mod handlers;
