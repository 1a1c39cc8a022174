//! Shared service context
//!
//! Bundles the client registry, the peer directory, and the session store
//! for the services and the API layer.

use std::sync::Arc;

use bridge_common::{AppConfig, AppResult};

use crate::directory::PeerDirectory;
use crate::registry::ClientRegistry;
use crate::store::SessionStore;

/// Everything the services need, shared across handlers.
pub struct BridgeContext {
    registry: ClientRegistry,
    directory: PeerDirectory,
    store: Arc<SessionStore>,
}

impl BridgeContext {
    /// Build the context from configuration, opening the session store.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let store = Arc::new(SessionStore::open(&config.storage.session_dir)?);
        Ok(Self {
            registry: ClientRegistry::new(store.clone(), config.telegram.clone()),
            directory: PeerDirectory::new(),
            store,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    #[must_use]
    pub fn directory(&self) -> &PeerDirectory {
        &self.directory
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

impl std::fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeContext")
            .field("registry", &self.registry)
            .field("directory", &self.directory)
            .finish()
    }
}
