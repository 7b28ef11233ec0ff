// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use kpi_analytics::application::report_service::ReportService;
use kpi_analytics::infrastructure::config::load_app_config;
use kpi_analytics::infrastructure::json_repository::JsonSampleRepository;
use kpi_analytics::presentation::app_state::AppState;
use kpi_analytics::presentation::handlers::{
    build_report, funnel, health_check, list_datasets, list_periods,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(JsonSampleRepository::load(&config.data.samples_path).await?);

    // Create services (application layer)
    let report_service = ReportService::new(
        repository,
        config.clock.clock(),
        config.heatmap.gradient(),
    );

    // Create application state
    let state = Arc::new(AppState { report_service });

    // Build router (presentation layer)
    // Responses are compressed per request in http_response, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/datasets", get(list_datasets))
        .route("/periods", get(list_periods))
        .route("/reports", post(build_report))
        .route("/funnel", post(funnel))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_addr))?;
    tracing::info!("Starting kpi-analytics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
