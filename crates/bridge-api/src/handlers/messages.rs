//! Message handlers
//!
//! History, send, edit, delete, and forward.

use axum::{
    extract::{Path, State},
    Json,
};
use bridge_telegram::{MessageService, MessageView};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extractors::{HistoryQuery, SessionId, ValidatedJson, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageView>,
    pub chat_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    pub reply_to: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditMessageRequest {
    pub chat_id: i64,
    pub message_id: i32,
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteMessageRequest {
    pub chat_id: i64,
    #[validate(length(min = 1, message = "at least one message id"))]
    pub message_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct DeleteMessageResponse {
    pub success: bool,
    pub deleted_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForwardRequest {
    pub from_chat: i64,
    pub to_chat: i64,
    #[validate(length(min = 1, message = "at least one message id"))]
    pub message_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Message history for a chat, newest first
///
/// GET /api/messages/{chat_id}
pub async fn get_messages(
    State(state): State<AppState>,
    session_id: SessionId,
    Path(chat_id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<HistoryQuery>,
) -> ApiResult<Json<MessagesResponse>> {
    let service = MessageService::new(state.context());
    let messages = service
        .history(session_id.as_str(), chat_id, query.limit, query.offset_id)
        .await?;
    Ok(Json(MessagesResponse { messages, chat_id }))
}

/// Send a text message
///
/// POST /api/messages/send
pub async fn send_message(
    State(state): State<AppState>,
    session_id: SessionId,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Json<MessageView>> {
    let service = MessageService::new(state.context());
    let message = service
        .send(
            session_id.as_str(),
            request.chat_id,
            &request.text,
            request.reply_to,
        )
        .await?;
    Ok(Json(message))
}

/// Edit a message
///
/// PUT /api/messages/edit
pub async fn edit_message(
    State(state): State<AppState>,
    session_id: SessionId,
    ValidatedJson(request): ValidatedJson<EditMessageRequest>,
) -> ApiResult<Json<MessageView>> {
    let service = MessageService::new(state.context());
    let message = service
        .edit(
            session_id.as_str(),
            request.chat_id,
            request.message_id,
            &request.text,
        )
        .await?;
    Ok(Json(message))
}

/// Delete messages
///
/// DELETE /api/messages/delete
pub async fn delete_messages(
    State(state): State<AppState>,
    session_id: SessionId,
    ValidatedJson(request): ValidatedJson<DeleteMessageRequest>,
) -> ApiResult<Json<DeleteMessageResponse>> {
    let service = MessageService::new(state.context());
    service
        .delete(
            session_id.as_str(),
            request.chat_id,
            request.message_ids.clone(),
        )
        .await?;
    Ok(Json(DeleteMessageResponse {
        success: true,
        deleted_ids: request.message_ids,
    }))
}

/// Forward messages to another chat
///
/// POST /api/messages/forward
pub async fn forward_messages(
    State(state): State<AppState>,
    session_id: SessionId,
    ValidatedJson(request): ValidatedJson<ForwardRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let service = MessageService::new(state.context());
    service
        .forward(
            session_id.as_str(),
            request.from_chat,
            request.to_chat,
            &request.message_ids,
        )
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}
