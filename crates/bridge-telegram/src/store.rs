//! Session persistence
//!
//! Sessions survive restarts as two pieces of state under the session
//! directory: a flat `sessions.json` index (session id → phone/created-at)
//! and one binary session file per session, written by the library's
//! `BinaryFileBackend`. The "session string" handed to API clients is the
//! base64 encoding of that file's bytes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bridge_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Name of the flat index file inside the session directory.
const INDEX_FILE: &str = "sessions.json";

/// Index entry for one saved session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Flat-file store for session material.
pub struct SessionStore {
    dir: PathBuf,
    index: Mutex<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    /// Open (or create) the store at the given directory.
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let index_path = dir.join(INDEX_FILE);
        let index = match fs::read_to_string(&index_path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, SessionRecord>>(&raw) {
                Ok(index) => {
                    info!(count = index.len(), "Loaded saved sessions");
                    index
                }
                Err(e) => {
                    warn!(error = %e, path = %index_path.display(), "Unreadable session index, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            dir,
            index: Mutex::new(index),
        })
    }

    /// Path of the binary session file for a session id.
    #[must_use]
    pub fn session_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.session"))
    }

    /// Whether the index knows this session id.
    #[must_use]
    pub fn contains(&self, session_id: &str) -> bool {
        self.index.lock().contains_key(session_id)
    }

    /// Whether both the index entry and the session file exist.
    #[must_use]
    pub fn is_restorable(&self, session_id: &str) -> bool {
        self.contains(session_id) && self.session_path(session_id).exists()
    }

    /// The saved record for a session id, if any.
    #[must_use]
    pub fn record(&self, session_id: &str) -> Option<SessionRecord> {
        self.index.lock().get(session_id).cloned()
    }

    /// All known session ids.
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        self.index.lock().keys().cloned().collect()
    }

    /// Insert (or overwrite) the index entry for a session.
    pub fn insert(&self, session_id: &str, phone: Option<String>) -> AppResult<()> {
        let mut index = self.index.lock();
        index.insert(
            session_id.to_string(),
            SessionRecord {
                phone,
                created_at: Utc::now(),
            },
        );
        self.persist(&index)
    }

    /// Remove a session's index entry and its session file.
    pub fn remove(&self, session_id: &str) -> AppResult<()> {
        let path = self.session_path(session_id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        let mut index = self.index.lock();
        if index.remove(session_id).is_some() {
            self.persist(&index)?;
        }
        Ok(())
    }

    /// Read the session file and encode it as a portable session string.
    pub fn export_string(&self, session_id: &str) -> AppResult<String> {
        let bytes = fs::read(self.session_path(session_id))?;
        Ok(BASE64.encode(bytes))
    }

    /// Decode a session string and write it as the session file for `session_id`.
    pub fn import_string(&self, session_id: &str, session_string: &str) -> AppResult<()> {
        let bytes = BASE64
            .decode(session_string.trim())
            .map_err(|_| AppError::InvalidInput("malformed session string".to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("empty session string".to_string()));
        }
        fs::write(self.session_path(session_id), bytes)?;
        Ok(())
    }

    fn persist(&self, index: &HashMap<String, SessionRecord>) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(index)
            .map_err(|e| AppError::internal(anyhow::anyhow!(e)))?;
        fs::write(self.dir.join(INDEX_FILE), raw)?;
        Ok(())
    }

    /// The directory this store lives in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("dir", &self.dir)
            .field("sessions", &self.index.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> SessionStore {
        let dir = std::env::temp_dir().join(format!("telebridge-store-{}", uuid::Uuid::new_v4()));
        SessionStore::open(dir).expect("store opens")
    }

    #[test]
    fn test_insert_and_reload() {
        let store = temp_store();
        store.insert("abc", Some("+15550100".to_string())).unwrap();
        assert!(store.contains("abc"));

        // A second store over the same directory sees the persisted index.
        let reopened = SessionStore::open(store.dir()).unwrap();
        let record = reopened.record("abc").expect("record survives reload");
        assert_eq!(record.phone.as_deref(), Some("+15550100"));
    }

    #[test]
    fn test_remove_deletes_file_and_entry() {
        let store = temp_store();
        store.insert("abc", None).unwrap();
        fs::write(store.session_path("abc"), b"blob").unwrap();
        assert!(store.is_restorable("abc"));

        store.remove("abc").unwrap();
        assert!(!store.contains("abc"));
        assert!(!store.session_path("abc").exists());
    }

    #[test]
    fn test_session_string_round_trip() {
        let store = temp_store();
        fs::write(store.session_path("abc"), b"\x01\x02\x03binary").unwrap();

        let exported = store.export_string("abc").unwrap();
        store.import_string("copy", &exported).unwrap();
        assert_eq!(fs::read(store.session_path("copy")).unwrap(), b"\x01\x02\x03binary");
    }

    #[test]
    fn test_import_rejects_garbage() {
        let store = temp_store();
        assert!(matches!(
            store.import_string("abc", "not base64 !!!"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.import_string("abc", ""),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_corrupt_index_starts_empty() {
        let dir = std::env::temp_dir().join(format!("telebridge-store-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(INDEX_FILE), "{ not json").unwrap();

        let store = SessionStore::open(&dir).unwrap();
        assert!(store.session_ids().is_empty());
    }
}
