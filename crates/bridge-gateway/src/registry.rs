//! Connection registry
//!
//! Tracks which WebSocket connections belong to which session and owns the
//! per-session update-pump task handles. Uses `DashMap` for thread-safe
//! access.

use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::protocol::Envelope;

/// Registry of active WebSocket connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    /// Session id → connection ids listening on it.
    sessions: DashMap<String, HashSet<Uuid>>,
    /// Connection id → outbound message queue.
    senders: DashMap<Uuid, mpsc::Sender<Envelope>>,
    /// Session id → running update-pump task.
    pumps: DashMap<String, JoinHandle<()>>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for a session; returns its connection id.
    pub fn add_connection(&self, session_id: &str, sender: mpsc::Sender<Envelope>) -> Uuid {
        let connection_id = Uuid::new_v4();
        self.senders.insert(connection_id, sender);
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(connection_id);

        tracing::debug!(session_id = %session_id, connection_id = %connection_id, "Connection added");
        connection_id
    }

    /// Remove a connection. Returns `true` when it was the session's last.
    pub fn remove_connection(&self, session_id: &str, connection_id: Uuid) -> bool {
        self.senders.remove(&connection_id);

        self.sessions.alter(session_id, |_, mut connections| {
            connections.remove(&connection_id);
            connections
        });
        let was_last = self
            .sessions
            .get(session_id)
            .is_none_or(|connections| connections.is_empty());
        self.sessions.retain(|_, connections| !connections.is_empty());

        tracing::debug!(session_id = %session_id, connection_id = %connection_id, "Connection removed");
        was_last
    }

    /// Send to a single connection.
    pub async fn send_to_connection(&self, connection_id: Uuid, envelope: Envelope) -> bool {
        let sender = self.senders.get(&connection_id).map(|s| s.clone());
        match sender {
            Some(sender) => sender.send(envelope).await.is_ok(),
            None => false,
        }
    }

    /// Send to every connection of a session; dead connections are pruned.
    pub async fn send_to_session(&self, session_id: &str, envelope: Envelope) -> usize {
        let connections: Vec<Uuid> = self
            .sessions
            .get(session_id)
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default();

        let mut sent = 0;
        let mut dead = Vec::new();
        for connection_id in connections {
            if self.send_to_connection(connection_id, envelope.clone()).await {
                sent += 1;
            } else {
                dead.push(connection_id);
            }
        }
        for connection_id in dead {
            self.remove_connection(session_id, connection_id);
        }

        tracing::trace!(session_id = %session_id, sent, "Event sent to session connections");
        sent
    }

    /// Broadcast to every connection of every session.
    pub async fn broadcast(&self, envelope: Envelope) -> usize {
        let session_ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        let mut sent = 0;
        for session_id in session_ids {
            sent += self.send_to_session(&session_id, envelope.clone()).await;
        }
        sent
    }

    /// Start an update pump for a session unless one is already running.
    pub fn ensure_pump(&self, session_id: &str, spawn: impl FnOnce() -> JoinHandle<()>) {
        self.pumps
            .entry(session_id.to_string())
            .or_insert_with(spawn);
    }

    /// Whether a pump is running for the session.
    #[must_use]
    pub fn has_pump(&self, session_id: &str) -> bool {
        self.pumps.contains_key(session_id)
    }

    /// Abort and forget the session's update pump.
    pub fn stop_pump(&self, session_id: &str) {
        if let Some((_, handle)) = self.pumps.remove(session_id) {
            handle.abort();
            tracing::debug!(session_id = %session_id, "Update pump stopped");
        }
    }

    /// Number of live connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }

    /// Number of sessions with at least one connection.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.senders.len())
            .field("sessions", &self.sessions.len())
            .field("pumps", &self.pumps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_remove_connection() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(10);

        let id = registry.add_connection("session1", tx);
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.session_count(), 1);

        assert!(registry.remove_connection("session1", id));
        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.session_count(), 0);
    }

    #[tokio::test]
    async fn test_last_connection_detection() {
        let registry = ConnectionRegistry::new();
        let (tx1, _rx1) = mpsc::channel(10);
        let (tx2, _rx2) = mpsc::channel(10);

        let a = registry.add_connection("session1", tx1);
        let b = registry.add_connection("session1", tx2);

        assert!(!registry.remove_connection("session1", a));
        assert!(registry.remove_connection("session1", b));
    }

    #[tokio::test]
    async fn test_send_to_session() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(10);
        registry.add_connection("session1", tx);

        let sent = registry
            .send_to_session("session1", Envelope::new("pong", serde_json::json!({})))
            .await;
        assert_eq!(sent, 1);

        let received = rx.recv().await.expect("event delivered");
        assert_eq!(received.event, "pong");
    }

    #[tokio::test]
    async fn test_dead_connections_are_pruned() {
        let registry = ConnectionRegistry::new();
        let (tx, rx) = mpsc::channel(1);
        registry.add_connection("session1", tx);
        drop(rx);

        let sent = registry
            .send_to_session("session1", Envelope::new("pong", serde_json::json!({})))
            .await;
        assert_eq!(sent, 0);
        assert_eq!(registry.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_pump_lifecycle() {
        let registry = ConnectionRegistry::new();
        let mut spawned = 0;

        registry.ensure_pump("session1", || {
            spawned += 1;
            tokio::spawn(async { tokio::time::sleep(std::time::Duration::from_secs(60)).await })
        });
        assert!(registry.has_pump("session1"));

        // A second attach must not start another pump.
        registry.ensure_pump("session1", || {
            spawned += 1;
            tokio::spawn(async {})
        });
        assert_eq!(spawned, 1);

        registry.stop_pump("session1");
        assert!(!registry.has_pump("session1"));
    }
}
