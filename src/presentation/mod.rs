// Presentation layer - HTTP handlers and display-only filters
pub mod app_state;
pub mod handlers;
pub mod view_filters;
