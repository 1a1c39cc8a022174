//! Chat service
//!
//! Dialog listings, single-entity lookups, contacts, avatars, read
//! acknowledgements, and typing indicators.

use std::collections::HashMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bridge_common::{AppError, AppResult};
use futures::future;
use layer_client::Client;
use layer_tl_types as tl;
use tracing::{debug, instrument};

use crate::context::BridgeContext;
use crate::error::map_invocation;
use crate::format;
use crate::peer::unmark;
use crate::types::{ChatKind, DialogSummary, EntitySummary};

/// Avatar downloads run this many fetches concurrently per batch.
const AVATAR_BATCH_SIZE: usize = 5;
/// Pause between avatar batches, to stay clear of flood limits.
const AVATAR_BATCH_DELAY: Duration = Duration::from_millis(200);

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a BridgeContext,
}

impl<'a> ChatService<'a> {
    pub fn new(ctx: &'a BridgeContext) -> Self {
        Self { ctx }
    }

    /// List dialogs, newest activity first (server order).
    #[instrument(skip(self))]
    pub async fn dialogs(&self, session_id: &str, limit: i32) -> AppResult<Vec<DialogSummary>> {
        let client = self.ctx.registry().require(session_id)?;
        let dialogs = client.get_dialogs(limit).await.map_err(map_invocation)?;

        let mut result = Vec::with_capacity(dialogs.len());
        for dialog in &dialogs {
            self.ctx.directory().insert_dialog(dialog);
            let Some(mut summary) = format::dialog_summary(dialog) else {
                continue;
            };
            if matches!(summary.kind, ChatKind::Channel | ChatKind::Supergroup) {
                if let Some(peer) = dialog.peer() {
                    if let Some(count) = self.channel_members(&client, peer).await {
                        summary.members_count = Some(count);
                    }
                }
            }
            result.push(summary);
        }
        Ok(result)
    }

    /// Look up a single chat by marked id.
    ///
    /// Only peers already seen in a listing can be resolved.
    #[instrument(skip(self))]
    pub async fn dialog_by_id(&self, session_id: &str, chat_id: i64) -> AppResult<EntitySummary> {
        let client = self.ctx.registry().require(session_id)?;
        let info = self
            .ctx
            .directory()
            .get(chat_id)
            .ok_or_else(|| AppError::not_found(format!("chat {chat_id}")))?;

        let mut members_count = info.members_count;
        if matches!(info.kind, ChatKind::Channel | ChatKind::Supergroup) {
            if let Some(count) = self.channel_members(&client, &info.peer).await {
                members_count = Some(count);
            }
        }

        Ok(EntitySummary {
            id: chat_id,
            kind: info.kind,
            name: info.name,
            username: info.username,
            members_count,
        })
    }

    /// List the account's contacts (non-bot, non-deleted users).
    #[instrument(skip(self))]
    pub async fn contacts(&self, session_id: &str) -> AppResult<Vec<DialogSummary>> {
        let client = self.ctx.registry().require(session_id)?;
        let contacts = client
            .invoke(&tl::functions::contacts::GetContacts { hash: 0 })
            .await
            .map_err(map_invocation)?;

        let users = match contacts {
            tl::enums::contacts::Contacts::Contacts(c) => c.users,
            tl::enums::contacts::Contacts::NotModified => vec![],
        };
        client.cache_users_slice_pub(&users).await;

        let mut result = Vec::new();
        for user in &users {
            let tl::enums::User::User(u) = user else {
                continue;
            };
            if u.bot || u.deleted {
                continue;
            }
            self.ctx.directory().insert_user(u);

            let name = {
                let name = format::full_name(u.first_name.as_deref(), u.last_name.as_deref());
                if name.is_empty() {
                    "Unknown".to_string()
                } else {
                    name
                }
            };
            result.push(DialogSummary {
                id: u.id,
                name,
                kind: ChatKind::User,
                username: u.username.clone(),
                phone: u.phone.clone(),
                status: Some(format::user_status_label(u.status.as_ref())),
                members_count: None,
                last_message: None,
                last_message_date: None,
                unread_count: 0,
                is_pinned: false,
                is_muted: false,
            });
        }
        Ok(result)
    }

    /// Profile photo of one entity as base64, `None` when absent or failed.
    #[instrument(skip(self))]
    pub async fn avatar(&self, session_id: &str, entity_id: i64) -> AppResult<Option<String>> {
        let client = self.ctx.registry().require(session_id)?;
        Ok(self.fetch_avatar(&client, entity_id).await)
    }

    /// Profile photos for many entities.
    ///
    /// Fetches run [`AVATAR_BATCH_SIZE`] at a time with a fixed pause between
    /// batches; entities without a photo (or whose download fails) are
    /// silently omitted.
    #[instrument(skip(self, entity_ids))]
    pub async fn avatars_batch(
        &self,
        session_id: &str,
        entity_ids: &[i64],
    ) -> AppResult<HashMap<i64, String>> {
        let client = self.ctx.registry().require(session_id)?;
        let mut result = HashMap::new();

        let batches: Vec<&[i64]> = entity_ids.chunks(AVATAR_BATCH_SIZE).collect();
        let total = batches.len();
        for (index, batch) in batches.into_iter().enumerate() {
            let fetches = batch.iter().map(|&id| {
                let client = client.clone();
                async move { (id, self.fetch_avatar(&client, id).await) }
            });
            for (id, avatar) in future::join_all(fetches).await {
                if let Some(avatar) = avatar {
                    result.insert(id, avatar);
                }
            }
            if index + 1 < total {
                tokio::time::sleep(AVATAR_BATCH_DELAY).await;
            }
        }
        Ok(result)
    }

    /// Mark all messages in a chat as read.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, session_id: &str, chat_id: i64) -> AppResult<()> {
        let client = self.ctx.registry().require(session_id)?;
        client
            .mark_as_read(unmark(chat_id))
            .await
            .map_err(map_invocation)
    }

    /// Send a typing indicator to a chat.
    #[instrument(skip(self))]
    pub async fn send_typing(&self, session_id: &str, chat_id: i64) -> AppResult<()> {
        let client = self.ctx.registry().require(session_id)?;
        client
            .send_chat_action(
                unmark(chat_id),
                tl::enums::SendMessageAction::SendMessageTypingAction,
            )
            .await
            .map_err(map_invocation)
    }

    async fn fetch_avatar(&self, client: &Client, entity_id: i64) -> Option<String> {
        let info = self.ctx.directory().get(entity_id)?;
        let photo_id = info.photo_id?;
        let peer = client.resolve_to_input_peer(&info.peer).await.ok()?;
        let location = tl::enums::InputFileLocation::InputPeerPhotoFileLocation(
            tl::types::InputPeerPhotoFileLocation {
                big: false,
                peer,
                photo_id,
            },
        );
        match client.download_media(location).await {
            Ok(bytes) if !bytes.is_empty() => Some(BASE64.encode(bytes)),
            Ok(_) => None,
            Err(e) => {
                debug!(entity_id, error = %e, "Avatar download failed");
                None
            }
        }
    }

    /// Best-effort member count via a full-channel fetch.
    async fn channel_members(&self, client: &Client, peer: &tl::enums::Peer) -> Option<i32> {
        let input = client.resolve_to_input_peer(peer).await.ok()?;
        let tl::enums::InputPeer::Channel(c) = input else {
            return None;
        };
        let request = tl::functions::channels::GetFullChannel {
            channel: tl::enums::InputChannel::InputChannel(tl::types::InputChannel {
                channel_id: c.channel_id,
                access_hash: c.access_hash,
            }),
        };
        let tl::enums::messages::ChatFull::ChatFull(full) = client.invoke(&request).await.ok()?;
        match full.full_chat {
            tl::enums::ChatFull::ChannelFull(f) => f.participants_count,
            _ => None,
        }
    }
}
