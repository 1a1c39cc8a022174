//! TL object → JSON view mapping
//!
//! Pure reshaping: every function here takes the library's raw TL objects
//! and produces the view structs in [`crate::types`]. No I/O.

use chrono::{DateTime, TimeZone, Utc};
use layer_tl_types as tl;

use crate::directory::PeerDirectory;
use crate::peer::mark_peer;
use crate::types::{ChatKind, DialogSummary, MediaKind, MessageView, UserProfile};

/// Dialog previews truncate the last message to this many characters.
const PREVIEW_LEN: usize = 100;

/// Join first/last name, trimming stray whitespace.
#[must_use]
pub fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    format!("{} {}", first.unwrap_or(""), last.unwrap_or(""))
        .trim()
        .to_string()
}

/// Convert a unix timestamp into a UTC datetime.
#[must_use]
pub fn timestamp(ts: i32) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(i64::from(ts), 0).single()
}

/// Reshape a TL user into the profile returned by auth endpoints.
#[must_use]
pub fn user_profile(user: &tl::types::User) -> UserProfile {
    UserProfile {
        id: user.id,
        first_name: user.first_name.clone().unwrap_or_default(),
        last_name: user.last_name.clone().unwrap_or_default(),
        username: user.username.clone(),
        phone: user.phone.clone(),
        is_bot: user.bot,
    }
}

/// Human-readable online-status label, matching what chat list UIs show.
#[must_use]
pub fn user_status_label(status: Option<&tl::enums::UserStatus>) -> String {
    match status {
        Some(tl::enums::UserStatus::Online(_)) => "online".to_string(),
        Some(tl::enums::UserStatus::Recently(_)) => "last seen recently".to_string(),
        Some(tl::enums::UserStatus::Offline(s)) if s.was_online != 0 => {
            match timestamp(s.was_online) {
                Some(when) => format!("last seen {}", when.format("%d.%m.%Y %H:%M")),
                None => "offline".to_string(),
            }
        }
        Some(tl::enums::UserStatus::Offline(_)) => "offline".to_string(),
        _ => "last seen a long time ago".to_string(),
    }
}

/// Profile-photo id of a user, if they have one.
#[must_use]
pub fn user_photo_id(photo: &tl::enums::UserProfilePhoto) -> Option<i64> {
    match photo {
        tl::enums::UserProfilePhoto::UserProfilePhoto(p) => Some(p.photo_id),
        _ => None,
    }
}

/// Profile-photo id of a group/channel, if it has one.
#[must_use]
pub fn chat_photo_id(photo: &tl::enums::ChatPhoto) -> Option<i64> {
    match photo {
        tl::enums::ChatPhoto::ChatPhoto(p) => Some(p.photo_id),
        _ => None,
    }
}

/// Classify document media from its attributes.
///
/// Returns the media kind plus the filename for plain documents.
#[must_use]
pub fn media_kind_from_attributes(
    attributes: &[tl::enums::DocumentAttribute],
) -> (MediaKind, Option<String>) {
    for attr in attributes {
        match attr {
            tl::enums::DocumentAttribute::Sticker(_) => return (MediaKind::Sticker, None),
            tl::enums::DocumentAttribute::Audio(a) => {
                return (
                    if a.voice { MediaKind::Voice } else { MediaKind::Audio },
                    None,
                );
            }
            tl::enums::DocumentAttribute::Video(v) => {
                return (
                    if v.round_message {
                        MediaKind::VideoNote
                    } else {
                        MediaKind::Video
                    },
                    None,
                );
            }
            _ => {}
        }
    }

    let file_name = attributes.iter().find_map(|attr| match attr {
        tl::enums::DocumentAttribute::Filename(f) => Some(f.file_name.clone()),
        _ => None,
    });
    (MediaKind::Document, file_name)
}

/// Classify message media into a kind + optional filename.
#[must_use]
pub fn classify_media(media: &tl::enums::MessageMedia) -> (Option<MediaKind>, Option<String>) {
    match media {
        tl::enums::MessageMedia::Photo(_) => (Some(MediaKind::Photo), None),
        tl::enums::MessageMedia::Document(md) => match &md.document {
            Some(tl::enums::Document::Document(doc)) => {
                let (kind, file_name) = media_kind_from_attributes(&doc.attributes);
                (Some(kind), file_name)
            }
            _ => (Some(MediaKind::Document), None),
        },
        // Other media (geo, contacts, polls, …) stays unclassified.
        _ => (None, None),
    }
}

fn reply_to_msg_id(header: Option<&tl::enums::MessageReplyHeader>) -> Option<i32> {
    match header {
        Some(tl::enums::MessageReplyHeader::MessageReplyHeader(h)) => h.reply_to_msg_id,
        _ => None,
    }
}

/// Reshape a TL message into a [`MessageView`].
///
/// Empty placeholder messages yield `None`; service messages come out with
/// empty text. Sender names resolve through the peer directory and fall back
/// to an empty string.
#[must_use]
pub fn message_view(message: &tl::enums::Message, directory: &PeerDirectory) -> Option<MessageView> {
    match message {
        tl::enums::Message::Message(m) => {
            let chat_id = mark_peer(&m.peer_id);
            let sender_id = m.from_id.as_ref().map(mark_peer).or(Some(chat_id));
            let (media_type, media_info) = m
                .media
                .as_ref()
                .map_or((None, None), classify_media);

            Some(MessageView {
                id: m.id,
                chat_id,
                sender_id,
                sender_name: sender_id.map(|id| directory.name_of(id)).unwrap_or_default(),
                text: m.message.clone(),
                date: timestamp(m.date),
                is_outgoing: m.out,
                reply_to_msg_id: reply_to_msg_id(m.reply_to.as_ref()),
                media_type,
                media_info,
                is_edited: m.edit_date.is_some(),
                views: m.views,
                forwards: m.forwards,
            })
        }
        tl::enums::Message::Service(m) => {
            let chat_id = mark_peer(&m.peer_id);
            let sender_id = m.from_id.as_ref().map(mark_peer).or(Some(chat_id));
            Some(MessageView {
                id: m.id,
                chat_id,
                sender_id,
                sender_name: sender_id.map(|id| directory.name_of(id)).unwrap_or_default(),
                text: String::new(),
                date: timestamp(m.date),
                is_outgoing: m.out,
                reply_to_msg_id: None,
                media_type: None,
                media_info: None,
                is_edited: false,
                views: None,
                forwards: None,
            })
        }
        tl::enums::Message::Empty(_) => None,
    }
}

/// Last-message preview text + date for a dialog entry.
#[must_use]
pub fn message_preview(
    message: Option<&tl::enums::Message>,
) -> (Option<String>, Option<DateTime<Utc>>) {
    let Some(tl::enums::Message::Message(m)) = message else {
        return match message {
            Some(tl::enums::Message::Service(s)) => (None, timestamp(s.date)),
            _ => (None, None),
        };
    };

    let text = if m.message.is_empty() {
        match &m.media {
            Some(tl::enums::MessageMedia::Photo(_)) => Some("\u{1f4f7} Photo".to_string()),
            Some(tl::enums::MessageMedia::Document(_)) => Some("\u{1f4ce} Document".to_string()),
            Some(_) => Some("\u{1f4ce} Media".to_string()),
            None => Some(String::new()),
        }
    } else {
        Some(m.message.chars().take(PREVIEW_LEN).collect())
    };

    (text, timestamp(m.date))
}

/// Reshape one dialog-listing entry.
///
/// Folder entries yield `None`. Member counts come from the entity itself;
/// the chat service upgrades channel counts with a full-channel fetch.
#[must_use]
pub fn dialog_summary(dialog: &layer_client::Dialog) -> Option<DialogSummary> {
    let tl::enums::Dialog::Dialog(raw) = &dialog.raw else {
        return None;
    };
    let peer = raw.peer.clone();
    let id = mark_peer(&peer);

    let mut kind = ChatKind::User;
    let mut username = None;
    let mut status = None;
    let mut members_count = None;

    match &peer {
        tl::enums::Peer::User(_) => {
            if let Some(tl::enums::User::User(u)) = &dialog.entity {
                username = u.username.clone();
                status = Some(user_status_label(u.status.as_ref()));
            } else {
                status = Some(user_status_label(None));
            }
        }
        tl::enums::Peer::Chat(_) => {
            kind = ChatKind::Group;
            if let Some(tl::enums::Chat::Chat(c)) = &dialog.chat {
                members_count = Some(c.participants_count);
            }
        }
        tl::enums::Peer::Channel(_) => {
            kind = ChatKind::Supergroup;
            if let Some(tl::enums::Chat::Channel(c)) = &dialog.chat {
                if c.broadcast {
                    kind = ChatKind::Channel;
                }
                username = c.username.clone();
                members_count = c.participants_count;
            }
        }
    }

    let name = {
        let title = dialog.title();
        if title.is_empty() {
            "Unknown".to_string()
        } else {
            title
        }
    };

    let (last_message, last_message_date) = message_preview(dialog.message.as_ref());

    let muted = {
        let tl::enums::PeerNotifySettings::PeerNotifySettings(settings) = &raw.notify_settings;
        settings
            .mute_until
            .is_some_and(|until| i64::from(until) > Utc::now().timestamp())
    };

    Some(DialogSummary {
        id,
        name,
        kind,
        username,
        phone: None,
        status,
        members_count,
        last_message,
        last_message_date,
        unread_count: raw.unread_count,
        is_pinned: raw.pinned,
        is_muted: muted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a plain TL message; only the interesting fields vary per test.
    fn plain_message(id: i32, text: &str, peer_id: tl::enums::Peer) -> tl::types::Message {
        tl::types::Message {
            out: false,
            mentioned: false,
            media_unread: false,
            silent: false,
            post: false,
            from_scheduled: false,
            legacy: false,
            edit_hide: false,
            pinned: false,
            noforwards: false,
            invert_media: false,
            offline: false,
            video_processing_pending: false,
            id,
            from_id: None,
            from_rank: None,
            peer_id,
            saved_peer_id: None,
            fwd_from: None,
            via_bot_id: None,
            via_business_bot_id: None,
            reply_to: None,
            date: 1_700_000_000,
            message: text.to_string(),
            media: None,
            reply_markup: None,
            entities: None,
            views: None,
            forwards: None,
            replies: None,
            edit_date: None,
            post_author: None,
            grouped_id: None,
            reactions: None,
            restriction_reason: None,
            ttl_period: None,
            quick_reply_shortcut_id: None,
            effect: None,
            factcheck: None,
            report_delivery_until_date: None,
            paid_message_stars: None,
            suggested_post: None,
            from_boosts_applied: None,
            paid_suggested_post_stars: false,
            paid_suggested_post_ton: false,
            schedule_repeat_period: None,
            summary_from_language: None,
        }
    }

    fn user_peer(user_id: i64) -> tl::enums::Peer {
        tl::enums::Peer::User(tl::types::PeerUser { user_id })
    }

    #[test]
    fn test_full_name_trims() {
        assert_eq!(full_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
        assert_eq!(full_name(Some("Ada"), None), "Ada");
        assert_eq!(full_name(None, None), "");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(user_status_label(None), "last seen a long time ago");
        let online = tl::enums::UserStatus::Online(tl::types::UserStatusOnline { expires: 0 });
        assert_eq!(user_status_label(Some(&online)), "online");

        let offline = tl::enums::UserStatus::Offline(tl::types::UserStatusOffline {
            was_online: 1_700_000_000,
        });
        assert!(user_status_label(Some(&offline)).starts_with("last seen "));

        let never = tl::enums::UserStatus::Offline(tl::types::UserStatusOffline {
            was_online: 0,
        });
        assert_eq!(user_status_label(Some(&never)), "offline");
    }

    #[test]
    fn test_media_kind_from_attributes() {
        let (kind, name) = media_kind_from_attributes(&[tl::enums::DocumentAttribute::Filename(
            tl::types::DocumentAttributeFilename {
                file_name: "report.pdf".to_string(),
            },
        )]);
        assert_eq!(kind, MediaKind::Document);
        assert_eq!(name.as_deref(), Some("report.pdf"));

        let (kind, name) = media_kind_from_attributes(&[tl::enums::DocumentAttribute::Audio(
            tl::types::DocumentAttributeAudio {
                voice: true,
                duration: 3,
                title: None,
                performer: None,
                waveform: None,
            },
        )]);
        assert_eq!(kind, MediaKind::Voice);
        assert!(name.is_none());

        let (kind, _) = media_kind_from_attributes(&[]);
        assert_eq!(kind, MediaKind::Document);
    }

    #[test]
    fn test_message_view_maps_core_fields() {
        let directory = PeerDirectory::new();
        let mut raw = plain_message(7, "hello", user_peer(42));
        raw.out = true;
        raw.edit_date = Some(1_700_000_100);
        raw.from_id = Some(user_peer(99));

        let view = message_view(&tl::enums::Message::Message(raw), &directory)
            .expect("plain messages map to views");
        assert_eq!(view.id, 7);
        assert_eq!(view.chat_id, 42);
        assert_eq!(view.sender_id, Some(99));
        assert_eq!(view.text, "hello");
        assert!(view.is_outgoing);
        assert!(view.is_edited);
        assert_eq!(view.sender_name, "");
        assert!(view.media_type.is_none());
    }

    #[test]
    fn test_message_view_falls_back_to_chat_sender() {
        let directory = PeerDirectory::new();
        let raw = plain_message(1, "post", user_peer(42));
        let view = message_view(&tl::enums::Message::Message(raw), &directory).unwrap();
        // Channel posts have no from_id; the chat itself is the sender.
        assert_eq!(view.sender_id, Some(42));
    }

    #[test]
    fn test_empty_message_is_skipped() {
        let empty = tl::enums::Message::Empty(tl::types::MessageEmpty {
            id: 5,
            peer_id: None,
        });
        assert!(message_view(&empty, &PeerDirectory::new()).is_none());
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long_text = "x".repeat(500);
        let raw = plain_message(1, &long_text, user_peer(42));
        let (preview, date) = message_preview(Some(&tl::enums::Message::Message(raw)));
        assert_eq!(preview.unwrap().chars().count(), 100);
        assert!(date.is_some());
    }
}
