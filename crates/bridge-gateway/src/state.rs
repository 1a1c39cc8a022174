//! Gateway state
//!
//! Shared dependencies for the WebSocket handler: the bridge context and the
//! connection registry. The API crate builds this from its own state.

use std::sync::Arc;

use bridge_telegram::BridgeContext;

use crate::registry::ConnectionRegistry;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    context: Arc<BridgeContext>,
    connections: Arc<ConnectionRegistry>,
}

impl GatewayState {
    pub fn new(context: Arc<BridgeContext>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            context,
            connections,
        }
    }

    #[must_use]
    pub fn context(&self) -> &Arc<BridgeContext> {
        &self.context
    }

    #[must_use]
    pub fn connections(&self) -> &Arc<ConnectionRegistry> {
        &self.connections
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connections", &self.connections)
            .finish()
    }
}
