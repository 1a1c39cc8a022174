//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use bridge_common::{AppConfig, AppError};
use bridge_telegram::BridgeContext;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let rate_limit = state.config().rate_limit.clone();
    let cors = state.config().cors.clone();
    let is_production = state.config().app.env.is_production();

    let router = apply_middleware(create_router(), &rate_limit, &cors, is_production);
    // Health + root bypass the rate limiter
    let router = router.merge(health_routes());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!(session_dir = %config.storage.session_dir, "Opening session store");
    let context = BridgeContext::from_config(&config)?;
    Ok(AppState::new(context, config))
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let host: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid SERVER_HOST: {}", config.server.host)))?;
    let addr = SocketAddr::new(host, config.server.port);

    // Create app state
    let state = create_app_state(config)?;
    let context = state.context_arc();

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await?;

    // Save every live session before exiting
    info!("Shutting down, saving sessions...");
    context.registry().shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}
