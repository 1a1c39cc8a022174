//! Chat handlers
//!
//! Dialog listings, entity lookups, contacts, avatars, read receipts, and
//! typing indicators.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use bridge_telegram::{ChatService, DialogSummary, EntitySummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extractors::{DialogsQuery, SessionId, ValidatedJson, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DialogsResponse {
    pub dialogs: Vec<DialogSummary>,
}

#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<DialogSummary>,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AvatarsBatchRequest {
    #[validate(length(min = 1, max = 100, message = "between 1 and 100 entity ids"))]
    pub entity_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct AvatarsBatchResponse {
    pub avatars: HashMap<i64, String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// List all dialogs
///
/// GET /api/chats/dialogs
pub async fn get_dialogs(
    State(state): State<AppState>,
    session_id: SessionId,
    ValidatedQuery(query): ValidatedQuery<DialogsQuery>,
) -> ApiResult<Json<DialogsResponse>> {
    let service = ChatService::new(state.context());
    let dialogs = service.dialogs(session_id.as_str(), query.limit).await?;
    Ok(Json(DialogsResponse { dialogs }))
}

/// Single dialog info
///
/// GET /api/chats/dialog/{chat_id}
pub async fn get_dialog(
    State(state): State<AppState>,
    session_id: SessionId,
    Path(chat_id): Path<i64>,
) -> ApiResult<Json<EntitySummary>> {
    let service = ChatService::new(state.context());
    let dialog = service.dialog_by_id(session_id.as_str(), chat_id).await?;
    Ok(Json(dialog))
}

/// Contact list
///
/// GET /api/chats/contacts
pub async fn get_contacts(
    State(state): State<AppState>,
    session_id: SessionId,
) -> ApiResult<Json<ContactsResponse>> {
    let service = ChatService::new(state.context());
    let contacts = service.contacts(session_id.as_str()).await?;
    Ok(Json(ContactsResponse { contacts }))
}

/// Profile photo as base64
///
/// GET /api/chats/avatar/{entity_id}
pub async fn get_avatar(
    State(state): State<AppState>,
    session_id: SessionId,
    Path(entity_id): Path<i64>,
) -> ApiResult<Json<AvatarResponse>> {
    let service = ChatService::new(state.context());
    let avatar = service.avatar(session_id.as_str(), entity_id).await?;
    Ok(Json(AvatarResponse { avatar }))
}

/// Profile photos for many entities, fetched in rate-limited batches
///
/// POST /api/chats/avatars
pub async fn get_avatars_batch(
    State(state): State<AppState>,
    session_id: SessionId,
    ValidatedJson(request): ValidatedJson<AvatarsBatchRequest>,
) -> ApiResult<Json<AvatarsBatchResponse>> {
    let service = ChatService::new(state.context());
    let avatars = service
        .avatars_batch(session_id.as_str(), &request.entity_ids)
        .await?;
    Ok(Json(AvatarsBatchResponse { avatars }))
}

/// Mark all messages in a chat as read
///
/// POST /api/chats/mark-read/{chat_id}
pub async fn mark_as_read(
    State(state): State<AppState>,
    session_id: SessionId,
    Path(chat_id): Path<i64>,
) -> ApiResult<Json<SuccessResponse>> {
    let service = ChatService::new(state.context());
    service.mark_read(session_id.as_str(), chat_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Send a typing indicator
///
/// POST /api/chats/typing/{chat_id}
pub async fn send_typing(
    State(state): State<AppState>,
    session_id: SessionId,
    Path(chat_id): Path<i64>,
) -> ApiResult<Json<SuccessResponse>> {
    let service = ChatService::new(state.context());
    service.send_typing(session_id.as_str(), chat_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
