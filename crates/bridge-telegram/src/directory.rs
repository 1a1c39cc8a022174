//! Peer directory
//!
//! The library hands back raw TL objects and offers no public entity lookup,
//! so every user/chat/channel that passes through a dialog or contact listing
//! is remembered here: marked id → display identity + profile-photo id + the
//! TL peer needed to resolve it again. Same idea as the library's internal
//! access-hash cache, kept at the view layer for names and avatars.

use dashmap::DashMap;
use layer_tl_types as tl;

use crate::format;
use crate::peer::mark_peer;
use crate::types::ChatKind;

/// Cached identity of one peer.
#[derive(Debug, Clone)]
pub struct PeerInfo {
    pub kind: ChatKind,
    pub name: String,
    pub username: Option<String>,
    pub photo_id: Option<i64>,
    pub peer: tl::enums::Peer,
    /// Participant count as reported on the entity itself (not the full fetch).
    pub members_count: Option<i32>,
}

/// Concurrent map of every peer seen in listings.
#[derive(Default)]
pub struct PeerDirectory {
    peers: DashMap<i64, PeerInfo>,
}

impl PeerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a peer by marked id.
    #[must_use]
    pub fn get(&self, chat_id: i64) -> Option<PeerInfo> {
        self.peers.get(&chat_id).map(|r| r.clone())
    }

    /// Display name for a marked id, empty string when unknown.
    #[must_use]
    pub fn name_of(&self, chat_id: i64) -> String {
        self.peers
            .get(&chat_id)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }

    /// Number of cached peers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Record a user entity.
    pub fn insert_user(&self, user: &tl::types::User) {
        let peer = tl::enums::Peer::User(tl::types::PeerUser { user_id: user.id });
        let name = format::full_name(user.first_name.as_deref(), user.last_name.as_deref());
        self.peers.insert(
            user.id,
            PeerInfo {
                kind: ChatKind::User,
                name,
                username: user.username.clone(),
                photo_id: user.photo.as_ref().and_then(format::user_photo_id),
                peer,
                members_count: None,
            },
        );
    }

    /// Record a group/channel entity.
    pub fn insert_chat(&self, chat: &tl::enums::Chat) {
        match chat {
            tl::enums::Chat::Chat(c) => {
                let peer = tl::enums::Peer::Chat(tl::types::PeerChat { chat_id: c.id });
                self.peers.insert(
                    mark_peer(&peer),
                    PeerInfo {
                        kind: ChatKind::Group,
                        name: c.title.clone(),
                        username: None,
                        photo_id: format::chat_photo_id(&c.photo),
                        peer,
                        members_count: Some(c.participants_count),
                    },
                );
            }
            tl::enums::Chat::Channel(c) => {
                let peer = tl::enums::Peer::Channel(tl::types::PeerChannel { channel_id: c.id });
                let kind = if c.broadcast {
                    ChatKind::Channel
                } else {
                    ChatKind::Supergroup
                };
                self.peers.insert(
                    mark_peer(&peer),
                    PeerInfo {
                        kind,
                        name: c.title.clone(),
                        username: c.username.clone(),
                        photo_id: format::chat_photo_id(&c.photo),
                        peer,
                        members_count: c.participants_count,
                    },
                );
            }
            // Forbidden/empty chats carry no identity worth caching.
            _ => {}
        }
    }

    /// Record everything referenced by a dialog listing entry.
    pub fn insert_dialog(&self, dialog: &layer_client::Dialog) {
        if let Some(tl::enums::User::User(user)) = &dialog.entity {
            self.insert_user(user);
        }
        if let Some(chat) = &dialog.chat {
            self.insert_chat(chat);
        }
    }
}

impl std::fmt::Debug for PeerDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerDirectory")
            .field("peers", &self.peers.len())
            .finish()
    }
}
