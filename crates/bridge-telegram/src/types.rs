//! JSON view types
//!
//! The shapes the API returns: reshaped, frontend-friendly projections of
//! the library's TL objects. Field names are part of the wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of conversation a chat id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    User,
    Group,
    Supergroup,
    Channel,
}

/// The logged-in account (or any plain user) as returned by auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_bot: bool,
}

/// One entry in the dialog (chat list) response. Contact listings reuse the
/// same shape with the message-related fields zeroed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub username: Option<String>,
    /// Only set on contact entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Online-status label for user dialogs ("online", "last seen recently", …).
    pub status: Option<String>,
    pub members_count: Option<i32>,
    pub last_message: Option<String>,
    pub last_message_date: Option<DateTime<Utc>>,
    pub unread_count: i32,
    pub is_pinned: bool,
    pub is_muted: bool,
}

/// Single-entity lookup response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members_count: Option<i32>,
}

/// Media classification for message views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    VideoNote,
    Audio,
    Voice,
    Sticker,
    Document,
}

/// One message, reshaped for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: i32,
    pub chat_id: i64,
    pub sender_id: Option<i64>,
    pub sender_name: String,
    pub text: String,
    pub date: Option<DateTime<Utc>>,
    pub is_outgoing: bool,
    pub reply_to_msg_id: Option<i32>,
    pub media_type: Option<MediaKind>,
    /// Filename for document media.
    pub media_info: Option<String>,
    pub is_edited: bool,
    pub views: Option<i32>,
    pub forwards: Option<i32>,
}

/// Raw media bytes pulled from Telegram, ready to stream to the client.
#[derive(Debug, Clone)]
pub struct MediaDownload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatKind::Supergroup).unwrap(), "\"supergroup\"");
        assert_eq!(serde_json::to_string(&ChatKind::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_media_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&MediaKind::VideoNote).unwrap(), "\"video_note\"");
        assert_eq!(serde_json::to_string(&MediaKind::Voice).unwrap(), "\"voice\"");
    }

    #[test]
    fn test_dialog_summary_uses_type_key() {
        let dialog = DialogSummary {
            id: -100,
            name: "devs".to_string(),
            kind: ChatKind::Group,
            username: None,
            phone: None,
            status: None,
            members_count: Some(7),
            last_message: Some("hi".to_string()),
            last_message_date: None,
            unread_count: 2,
            is_pinned: false,
            is_muted: true,
        };
        let json = serde_json::to_value(&dialog).unwrap();
        assert_eq!(json["type"], "group");
        assert_eq!(json["unread_count"], 2);
    }
}
