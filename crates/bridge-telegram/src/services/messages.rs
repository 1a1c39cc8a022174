//! Message service
//!
//! History queries plus send/edit/delete/forward. The library's write calls
//! return no message object, so send and edit fetch their echo from history;
//! the authoritative copy still arrives on the update stream.

use bridge_common::{AppError, AppResult};
use layer_client::{Client, InputMessage};
use layer_tl_types as tl;
use tracing::instrument;

use crate::context::BridgeContext;
use crate::error::map_invocation;
use crate::format;
use crate::peer::unmark;
use crate::types::MessageView;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a BridgeContext,
}

impl<'a> MessageService<'a> {
    pub fn new(ctx: &'a BridgeContext) -> Self {
        Self { ctx }
    }

    /// Fetch message history, newest first.
    ///
    /// `offset_id` pages backwards: only messages older than it are returned.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        session_id: &str,
        chat_id: i64,
        limit: i32,
        offset_id: i32,
    ) -> AppResult<Vec<MessageView>> {
        let client = self.ctx.registry().require(session_id)?;
        let input = self.input_peer(&client, chat_id).await?;
        let messages = client
            .get_messages(input, limit, offset_id)
            .await
            .map_err(map_invocation)?;

        Ok(messages
            .iter()
            .filter_map(|m| format::message_view(&m.raw, self.ctx.directory()))
            .collect())
    }

    /// Send a text message and return its history echo.
    #[instrument(skip(self, text))]
    pub async fn send(
        &self,
        session_id: &str,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> AppResult<MessageView> {
        let client = self.ctx.registry().require(session_id)?;
        let peer = unmark(chat_id);
        let message = InputMessage::text(text).reply_to(reply_to);
        client
            .send_message_to_peer_ex(peer, &message)
            .await
            .map_err(map_invocation)?;

        self.newest_message(&client, chat_id).await
    }

    /// Edit a message and return the edited view.
    #[instrument(skip(self, text))]
    pub async fn edit(
        &self,
        session_id: &str,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> AppResult<MessageView> {
        let client = self.ctx.registry().require(session_id)?;
        client
            .edit_message(unmark(chat_id), message_id, text)
            .await
            .map_err(map_invocation)?;

        let views = self.views_by_id(&client, chat_id, &[message_id]).await?;
        views
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("message {message_id}")))
    }

    /// Delete messages (for everyone).
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        session_id: &str,
        chat_id: i64,
        message_ids: Vec<i32>,
    ) -> AppResult<()> {
        let client = self.ctx.registry().require(session_id)?;
        // chat_id is part of the API contract but the library addresses
        // messages globally for non-channel peers.
        let _ = chat_id;
        client
            .delete_messages(message_ids, true)
            .await
            .map_err(map_invocation)
    }

    /// Forward messages between chats.
    #[instrument(skip(self))]
    pub async fn forward(
        &self,
        session_id: &str,
        from_chat: i64,
        to_chat: i64,
        message_ids: &[i32],
    ) -> AppResult<()> {
        let client = self.ctx.registry().require(session_id)?;
        client
            .forward_messages(unmark(to_chat), message_ids, unmark(from_chat))
            .await
            .map_err(map_invocation)
    }

    /// Fetch specific messages by id as views.
    pub async fn views_by_id(
        &self,
        client: &Client,
        chat_id: i64,
        message_ids: &[i32],
    ) -> AppResult<Vec<MessageView>> {
        let messages = client
            .get_messages_by_id(unmark(chat_id), message_ids)
            .await
            .map_err(map_invocation)?;
        Ok(messages
            .iter()
            .filter_map(|m| format::message_view(&m.raw, self.ctx.directory()))
            .collect())
    }

    /// The most recent message in a chat, used as the echo for writes.
    pub(crate) async fn newest_message(
        &self,
        client: &Client,
        chat_id: i64,
    ) -> AppResult<MessageView> {
        let input = self.input_peer(client, chat_id).await?;
        let messages = client
            .get_messages(input, 1, 0)
            .await
            .map_err(map_invocation)?;
        messages
            .iter()
            .filter_map(|m| format::message_view(&m.raw, self.ctx.directory()))
            .next()
            .ok_or_else(|| AppError::upstream("sent message not visible in history"))
    }

    /// Resolve a marked chat id to an input peer.
    ///
    /// Resolution fails for peers the library has never seen; surface that
    /// as a 404 rather than an upstream error.
    async fn input_peer(
        &self,
        client: &Client,
        chat_id: i64,
    ) -> AppResult<tl::enums::InputPeer> {
        client
            .resolve_to_input_peer(&unmark(chat_id))
            .await
            .map_err(|_| AppError::not_found(format!("chat {chat_id}")))
    }
}
