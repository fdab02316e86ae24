//! waypoint-relay server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay endpoint.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use waypoint_relay::api;
use waypoint_relay::app_state::AppState;
use waypoint_relay::config::RelayConfig;
use waypoint_relay::domain::{EventBus, RoomRegistry};
use waypoint_relay::service::PresenceService;
use waypoint_relay::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RelayConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        scope = ?config.broadcast_scope,
        "starting waypoint-relay"
    );

    // Build domain layer
    let registry = Arc::new(RoomRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let presence = Arc::new(PresenceService::new(
        registry,
        event_bus,
        config.broadcast_scope,
    ));

    // Build application state
    let app_state = AppState { presence };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
