//! Media service
//!
//! Upload-and-send, full downloads, and previews. Bytes stream through
//! memory; nothing is cached on disk.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bridge_common::{AppError, AppResult};
use layer_client::update::IncomingMessage;
use layer_client::Client;
use layer_tl_types as tl;
use tracing::instrument;

use crate::context::BridgeContext;
use crate::error::map_invocation;
use crate::format;
use crate::peer::unmark;
use crate::services::MessageService;
use crate::types::{MediaDownload, MessageView};

/// Media service
pub struct MediaService<'a> {
    ctx: &'a BridgeContext,
}

impl<'a> MediaService<'a> {
    pub fn new(ctx: &'a BridgeContext) -> Self {
        Self { ctx }
    }

    /// Upload a file and send it to a chat, returning the history echo.
    ///
    /// Image uploads go out as photos, everything else as documents.
    #[instrument(skip(self, data, caption), fields(size = data.len()))]
    pub async fn send_file(
        &self,
        session_id: &str,
        chat_id: i64,
        data: &[u8],
        file_name: &str,
        mime_type: &str,
        caption: Option<&str>,
        reply_to: Option<i32>,
    ) -> AppResult<MessageView> {
        let client = self.ctx.registry().require(session_id)?;
        let peer = client
            .resolve_to_input_peer(&unmark(chat_id))
            .await
            .map_err(|_| AppError::not_found(format!("chat {chat_id}")))?;

        let uploaded = client
            .upload_file(data, file_name, mime_type)
            .await
            .map_err(map_invocation)?;
        let media = if mime_type.starts_with("image/") {
            uploaded.as_photo_media()
        } else {
            uploaded.as_document_media()
        };

        let reply_header = reply_to.map(|id| {
            tl::enums::InputReplyTo::Message(tl::types::InputReplyToMessage {
                reply_to_msg_id: id,
                top_msg_id: None,
                reply_to_peer_id: None,
                quote_text: None,
                quote_entities: None,
                quote_offset: None,
                monoforum_peer_id: None,
                todo_item_id: None,
                poll_option: None,
            })
        });

        let request = tl::functions::messages::SendMedia {
            silent: false,
            background: false,
            clear_draft: false,
            noforwards: false,
            update_stickersets_order: false,
            invert_media: false,
            allow_paid_floodskip: false,
            peer,
            reply_to: reply_header,
            media,
            message: caption.unwrap_or_default().to_string(),
            random_id: layer_client::random_i64_pub(),
            reply_markup: None,
            entities: None,
            schedule_date: None,
            schedule_repeat_period: None,
            send_as: None,
            quick_reply_shortcut: None,
            effect: None,
            allow_paid_stars: None,
            suggested_post: None,
        };
        client.invoke(&request).await.map_err(map_invocation)?;

        MessageService::new(self.ctx)
            .newest_message(&client, chat_id)
            .await
    }

    /// Download the media attached to a message.
    #[instrument(skip(self))]
    pub async fn download(
        &self,
        session_id: &str,
        chat_id: i64,
        message_id: i32,
    ) -> AppResult<MediaDownload> {
        let client = self.ctx.registry().require(session_id)?;
        let message = self.message_by_id(&client, chat_id, message_id).await?;

        let location = message
            .download_location()
            .ok_or_else(|| AppError::not_found("media"))?;
        let bytes = client
            .download_media(location)
            .await
            .map_err(map_invocation)?;
        if bytes.is_empty() {
            return Err(AppError::not_found("media"));
        }

        let (mime_type, file_name) = match media_of(&message) {
            Some(tl::enums::MessageMedia::Photo(_)) => {
                ("image/jpeg".to_string(), format!("photo_{message_id}.jpg"))
            }
            Some(tl::enums::MessageMedia::Document(md)) => match &md.document {
                Some(tl::enums::Document::Document(doc)) => {
                    let name = format::media_kind_from_attributes(&doc.attributes)
                        .1
                        .unwrap_or_else(|| format!("file_{message_id}"));
                    (doc.mime_type.clone(), name)
                }
                _ => (
                    "application/octet-stream".to_string(),
                    format!("file_{message_id}"),
                ),
            },
            _ => (
                "application/octet-stream".to_string(),
                format!("file_{message_id}"),
            ),
        };

        Ok(MediaDownload {
            bytes,
            mime_type,
            file_name,
        })
    }

    /// A preview image for a message's media as base64 JPEG.
    ///
    /// Photos are returned as-is; documents fall back to their first
    /// thumbnail.
    #[instrument(skip(self))]
    pub async fn preview(
        &self,
        session_id: &str,
        chat_id: i64,
        message_id: i32,
    ) -> AppResult<String> {
        let client = self.ctx.registry().require(session_id)?;
        let message = self.message_by_id(&client, chat_id, message_id).await?;

        let location = match media_of(&message) {
            Some(tl::enums::MessageMedia::Photo(_)) => message
                .download_location()
                .ok_or_else(|| AppError::not_found("preview"))?,
            Some(tl::enums::MessageMedia::Document(md)) => {
                document_thumb_location(md).ok_or_else(|| AppError::not_found("preview"))?
            }
            _ => return Err(AppError::not_found("preview")),
        };

        let bytes = client
            .download_media(location)
            .await
            .map_err(map_invocation)?;
        if bytes.is_empty() {
            return Err(AppError::not_found("preview"));
        }
        Ok(BASE64.encode(bytes))
    }

    async fn message_by_id(
        &self,
        client: &Client,
        chat_id: i64,
        message_id: i32,
    ) -> AppResult<IncomingMessage> {
        let mut messages = client
            .get_messages_by_id(unmark(chat_id), &[message_id])
            .await
            .map_err(map_invocation)?;
        if messages.is_empty() {
            return Err(AppError::not_found(format!("message {message_id}")));
        }
        Ok(messages.remove(0))
    }
}

fn media_of(message: &IncomingMessage) -> Option<&tl::enums::MessageMedia> {
    match &message.raw {
        tl::enums::Message::Message(m) => m.media.as_ref(),
        _ => None,
    }
}

/// Location of the first (smallest) thumbnail of a document.
fn document_thumb_location(
    media: &tl::types::MessageMediaDocument,
) -> Option<tl::enums::InputFileLocation> {
    let tl::enums::Document::Document(doc) = media.document.as_ref()? else {
        return None;
    };
    let thumb_size = doc.thumbs.as_ref()?.iter().find_map(|s| match s {
        tl::enums::PhotoSize::PhotoSize(ps) => Some(ps.r#type.clone()),
        _ => None,
    })?;

    Some(tl::enums::InputFileLocation::InputDocumentFileLocation(
        tl::types::InputDocumentFileLocation {
            id: doc.id,
            access_hash: doc.access_hash,
            file_reference: doc.file_reference.clone(),
            thumb_size,
        },
    ))
}
