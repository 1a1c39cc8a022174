//! Application state
//!
//! Holds the shared state for the Axum application: the bridge context, the
//! WebSocket connection registry, and configuration.

use std::sync::Arc;

use axum::extract::FromRef;
use bridge_common::AppConfig;
use bridge_gateway::{ConnectionRegistry, GatewayState};
use bridge_telegram::BridgeContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    context: Arc<BridgeContext>,
    connections: Arc<ConnectionRegistry>,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(context: BridgeContext, config: AppConfig) -> Self {
        Self {
            context: Arc::new(context),
            connections: Arc::new(ConnectionRegistry::new()),
            config: Arc::new(config),
        }
    }

    /// Get the bridge context
    pub fn context(&self) -> &BridgeContext {
        &self.context
    }

    /// Get the bridge context handle
    pub fn context_arc(&self) -> Arc<BridgeContext> {
        self.context.clone()
    }

    /// Get the WebSocket connection registry
    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl FromRef<AppState> for GatewayState {
    fn from_ref(state: &AppState) -> Self {
        GatewayState::new(state.context.clone(), state.connections.clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("context", &"BridgeContext")
            .field("config", &"AppConfig")
            .finish()
    }
}
