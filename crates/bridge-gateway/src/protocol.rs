//! Wire protocol
//!
//! Every frame in both directions is a JSON envelope: `{"event": …,
//! "data": …}`. Server-side event names and the inbound command payloads
//! live here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server → client event names.
pub mod events {
    pub const NEW_MESSAGE: &str = "new_message";
    pub const MESSAGE_EDITED: &str = "message_edited";
    pub const MESSAGE_DELETED: &str = "message_deleted";
    pub const ERROR: &str = "error";
    pub const PONG: &str = "pong";
}

/// Client → server command names.
pub mod commands {
    pub const SEND_MESSAGE: &str = "send_message";
    pub const EDIT_MESSAGE: &str = "edit_message";
    pub const DELETE_MESSAGE: &str = "delete_message";
    pub const MARK_READ: &str = "mark_read";
    pub const START_TYPING: &str = "start_typing";
    pub const PING: &str = "ping";
}

/// A WebSocket frame in either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Build an envelope from any serializable payload.
    pub fn new(event: &str, data: impl Serialize) -> Self {
        Self {
            event: event.to_string(),
            data: serde_json::to_value(data).unwrap_or(Value::Null),
        }
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse an incoming frame.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// `send_message` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageParams {
    pub chat_id: i64,
    pub text: String,
    #[serde(default)]
    pub reply_to: Option<i32>,
}

/// `edit_message` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EditMessageParams {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
}

/// `delete_message` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteMessageParams {
    pub chat_id: i64,
    #[serde(default)]
    pub message_ids: Vec<i32>,
}

/// `mark_read` / `start_typing` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatParams {
    pub chat_id: i64,
}

/// `message_deleted` event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeletedEvent {
    /// Marked channel id, absent for private/group deletions (the library
    /// does not report which chat they happened in).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    pub message_ids: Vec<i32>,
}

/// `error` event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub action: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_round_trip() {
        let envelope = Envelope::new(events::PONG, serde_json::json!({}));
        let json = envelope.to_json().unwrap();
        let parsed = Envelope::from_json(&json).unwrap();
        assert_eq!(parsed.event, "pong");
    }

    #[test]
    fn test_envelope_tolerates_missing_data() {
        let parsed = Envelope::from_json(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(parsed.event, "ping");
        assert!(parsed.data.is_null());
    }

    #[test]
    fn test_send_message_params() {
        let envelope = Envelope::from_json(
            r#"{"event":"send_message","data":{"chat_id":42,"text":"hi"}}"#,
        )
        .unwrap();
        let params: SendMessageParams = serde_json::from_value(envelope.data).unwrap();
        assert_eq!(params.chat_id, 42);
        assert_eq!(params.text, "hi");
        assert!(params.reply_to.is_none());
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        assert!(Envelope::from_json("not json").is_err());
    }

    #[test]
    fn test_message_deleted_event_omits_unknown_chat() {
        let event = MessageDeletedEvent {
            chat_id: None,
            message_ids: vec![1, 2],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("chat_id").is_none());
        assert_eq!(json["message_ids"], serde_json::json!([1, 2]));
    }
}
