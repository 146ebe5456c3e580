// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::application::dashboard_service::DashboardService;
use crate::application::mapping_service::MappingService;
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::dataset::Dataset;
use crate::infrastructure::config::{load_dashboard_config, load_warehouse_config};
use crate::infrastructure::warehouse_repository::WarehouseRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_controls, get_state, health_check, overlay_png, render_dashboard, update_state,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let warehouse_config = load_warehouse_config()?;
    let dashboard_config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn TelemetryRepository> = Arc::new(WarehouseRepository::new(
        warehouse_config.warehouse.host,
        warehouse_config.warehouse.token,
        warehouse_config.warehouse.database,
    ));

    // One-time blocking load; any failure aborts before the UI endpoint opens
    let records = repository.fetch_fleet_telemetry().await?;
    let dataset = Arc::new(Dataset::new(records)?);
    println!(
        "Loaded {} telemetry records for {} trucks",
        dataset.records().len(),
        dataset.trucks().len()
    );

    // Create services (application layer)
    let mapping_service = MappingService::new(dataset.clone());
    let dashboard_service = DashboardService::new(dataset, dashboard_config.render_settings());

    // Create application state
    let state = Arc::new(AppState {
        mapping_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    // Note: We handle compression manually in our response builders,
    // so we don't use CompressionLayer to avoid double compression
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/controls", get(get_controls))
        .route("/state", get(get_state).patch(update_state))
        .route("/dashboard", get(render_dashboard))
        .route("/dashboard/overlay.png", get(overlay_png))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = dashboard_config.bind_addr.parse()?;
    println!("Starting fleet-mapping service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
