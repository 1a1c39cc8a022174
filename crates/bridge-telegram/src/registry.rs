//! Client registry
//!
//! Maps session ids to live library clients plus the transient login state
//! (login-code and 2FA challenge tokens) that the wrapped library hands out
//! as opaque values. Pure map bookkeeping; every entry lives for as long as
//! the session is connected.

use std::sync::Arc;

use bridge_common::{AppError, AppResult, TelegramConfig};
use dashmap::DashMap;
use layer_client::{Client, Config, LoginToken, PasswordToken};
use layer_client::session_backend::BinaryFileBackend;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::map_invocation;
use crate::store::SessionStore;

/// Registry of live clients and pending login challenges.
pub struct ClientRegistry {
    clients: DashMap<String, Client>,
    /// Pending login-code challenges: session id → (phone, token).
    pending_logins: DashMap<String, (String, LoginToken)>,
    /// Pending 2FA challenges: session id → (phone, token).
    pending_passwords: DashMap<String, (Option<String>, PasswordToken)>,
    store: Arc<SessionStore>,
    telegram: TelegramConfig,
}

impl ClientRegistry {
    #[must_use]
    pub fn new(store: Arc<SessionStore>, telegram: TelegramConfig) -> Self {
        Self {
            clients: DashMap::new(),
            pending_logins: DashMap::new(),
            pending_passwords: DashMap::new(),
            store,
            telegram,
        }
    }

    /// Generate a fresh session id.
    #[must_use]
    pub fn generate_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn client_config(&self, session_id: &str) -> Config {
        Config {
            api_id: self.telegram.api_id,
            api_hash: self.telegram.api_hash.clone(),
            session_backend: Arc::new(BinaryFileBackend::new(self.store.session_path(session_id))),
            ..Config::default()
        }
    }

    /// Connect a client for the given session id and register it.
    ///
    /// Any session file already on disk for that id is picked up by the
    /// library's session backend.
    pub async fn connect(&self, session_id: &str) -> AppResult<Client> {
        let (client, _shutdown) = Client::connect(self.client_config(session_id))
            .await
            .map_err(map_invocation)?;
        self.clients.insert(session_id.to_string(), client.clone());
        info!(session_id = %session_id, "Telegram client connected");
        Ok(client)
    }

    /// Create a brand-new session with a connected client.
    pub async fn create_session(&self) -> AppResult<(String, Client)> {
        let session_id = Self::generate_session_id();
        let client = self.connect(&session_id).await?;
        Ok((session_id, client))
    }

    /// Get the live client for a session, if connected.
    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<Client> {
        self.clients.get(session_id).map(|c| c.clone())
    }

    /// Get the live client for a session or fail with 401.
    pub fn require(&self, session_id: &str) -> AppResult<Client> {
        self.get(session_id).ok_or(AppError::SessionNotFound)
    }

    /// Get the live client, restoring it from a saved session file if needed.
    ///
    /// Expired saved sessions are removed from disk on the way out.
    pub async fn get_or_restore(&self, session_id: &str) -> AppResult<Client> {
        if let Some(client) = self.get(session_id) {
            return Ok(client);
        }
        if !self.store.is_restorable(session_id) {
            return Err(AppError::SessionNotFound);
        }

        let client = self.connect(session_id).await?;
        let authorized = client.is_authorized().await.map_err(map_invocation)?;
        if authorized {
            info!(session_id = %session_id, "Auto-restored session");
            Ok(client)
        } else {
            self.clients.remove(session_id);
            if let Err(e) = self.store.remove(session_id) {
                warn!(session_id = %session_id, error = %e, "Failed to prune expired session");
            }
            Err(AppError::NotAuthorized("session expired".to_string()))
        }
    }

    /// Stash the login-code challenge for a session.
    pub fn stash_login(&self, session_id: &str, phone: String, token: LoginToken) {
        self.pending_logins
            .insert(session_id.to_string(), (phone, token));
    }

    /// Take the login-code challenge for a session.
    #[must_use]
    pub fn take_login(&self, session_id: &str) -> Option<(String, LoginToken)> {
        self.pending_logins.remove(session_id).map(|(_, v)| v)
    }

    /// Stash the 2FA challenge for a session.
    pub fn stash_password(&self, session_id: &str, phone: Option<String>, token: PasswordToken) {
        self.pending_passwords
            .insert(session_id.to_string(), (phone, token));
    }

    /// Take the 2FA challenge for a session.
    #[must_use]
    pub fn take_password(&self, session_id: &str) -> Option<(Option<String>, PasswordToken)> {
        self.pending_passwords.remove(session_id).map(|(_, v)| v)
    }

    /// Drop every trace of a session: client, pending challenges, saved files.
    pub fn remove(&self, session_id: &str) -> AppResult<()> {
        self.clients.remove(session_id);
        self.pending_logins.remove(session_id);
        self.pending_passwords.remove(session_id);
        self.store.remove(session_id)
    }

    /// Drop the live client only, keeping saved session material.
    pub fn disconnect(&self, session_id: &str) {
        self.clients.remove(session_id);
    }

    /// Number of live clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Save every live session to disk and drop the clients.
    ///
    /// Called on graceful shutdown; the library has no explicit disconnect,
    /// dropping the client closes its connections.
    pub async fn shutdown(&self) {
        let session_ids: Vec<String> = self.clients.iter().map(|e| e.key().clone()).collect();
        for session_id in session_ids {
            if let Some((_, client)) = self.clients.remove(&session_id) {
                if let Err(e) = client.save_session().await {
                    warn!(session_id = %session_id, error = %e, "Failed to save session on shutdown");
                }
            }
        }
        self.pending_logins.clear();
        self.pending_passwords.clear();
        info!("All Telegram clients disconnected");
    }
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("clients", &self.clients.len())
            .field("pending_logins", &self.pending_logins.len())
            .field("pending_passwords", &self.pending_passwords.len())
            .finish()
    }
}
