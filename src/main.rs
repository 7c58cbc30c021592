//! order-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket endpoint and the event
//! intake API.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use order_gateway::api;
use order_gateway::app_state::AppState;
use order_gateway::config::GatewayConfig;
use order_gateway::domain::{ChannelRegistry, SessionStore};
use order_gateway::service::{EventBroadcaster, SubscriptionService};
use order_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting order-gateway");

    // Build domain layer
    let sessions = Arc::new(SessionStore::new());
    let registry = Arc::new(ChannelRegistry::new());

    // Build service layer
    let subscriptions = SubscriptionService::new(Arc::clone(&sessions), Arc::clone(&registry));
    let broadcaster = EventBroadcaster::new(Arc::clone(&sessions), Arc::clone(&registry));

    // Build application state
    let app_state = AppState {
        sessions,
        subscriptions,
        broadcaster,
        outbound_queue_capacity: config.outbound_queue_capacity,
    };

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
