//! Media handlers
//!
//! Upload-and-send, downloads, and previews. Bytes stream through memory in
//! both directions; nothing touches the local disk.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bridge_telegram::{MediaService, MessageView};
use serde::{Deserialize, Serialize};

use crate::extractors::SessionId;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub chat_id: i64,
    pub caption: Option<String>,
    pub reply_to: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub preview: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Upload a file and send it to a chat
///
/// POST /api/media/upload
pub async fn upload_and_send(
    State(state): State<AppState>,
    session_id: SessionId,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> ApiResult<Json<MessageView>> {
    // One file per request; the first part is the payload.
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?
        .ok_or_else(|| ApiError::Multipart("missing file field".to_string()))?;

    let file_name = field
        .file_name()
        .map_or_else(|| "upload.bin".to_string(), ToString::to_string);
    let mime_type = field
        .content_type()
        .map_or_else(|| "application/octet-stream".to_string(), ToString::to_string);
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?;
    if data.is_empty() {
        return Err(ApiError::Multipart("empty file".to_string()));
    }

    let service = MediaService::new(state.context());
    let message = service
        .send_file(
            session_id.as_str(),
            query.chat_id,
            &data,
            &file_name,
            &mime_type,
            query.caption.as_deref(),
            query.reply_to,
        )
        .await?;
    Ok(Json(message))
}

/// Download the media attached to a message
///
/// GET /api/media/download/{chat_id}/{message_id}
pub async fn download_media(
    State(state): State<AppState>,
    session_id: SessionId,
    Path((chat_id, message_id)): Path<(i64, i32)>,
) -> ApiResult<Response> {
    let service = MediaService::new(state.context());
    let download = service
        .download(session_id.as_str(), chat_id, message_id)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, download.mime_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.file_name),
        ),
    ];
    Ok((headers, download.bytes).into_response())
}

/// Media preview as base64
///
/// GET /api/media/preview/{chat_id}/{message_id}
pub async fn get_media_preview(
    State(state): State<AppState>,
    session_id: SessionId,
    Path((chat_id, message_id)): Path<(i64, i32)>,
) -> ApiResult<Json<PreviewResponse>> {
    let service = MediaService::new(state.context());
    let preview = service
        .preview(session_id.as_str(), chat_id, message_id)
        .await?;
    Ok(Json(PreviewResponse {
        preview,
        mime_type: "image/jpeg".to_string(),
    }))
}
