//! Route definitions
//!
//! All API routes organized by domain and mounted under /api, plus the
//! WebSocket endpoint.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, chats, health, media, messages};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health, which is
/// mounted separately to bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws", get(bridge_gateway::gateway_handler))
}

/// Health check + root routes (bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(health::root))
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(chat_routes())
        .merge(message_routes())
        .merge(media_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/send-code", post(auth::send_code))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-in-2fa", post(auth::sign_in_2fa))
        .route("/auth/restore-session", post(auth::restore_session))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_me))
}

/// Chat routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats/dialogs", get(chats::get_dialogs))
        .route("/chats/dialog/:chat_id", get(chats::get_dialog))
        .route("/chats/contacts", get(chats::get_contacts))
        .route("/chats/avatar/:entity_id", get(chats::get_avatar))
        .route("/chats/avatars", post(chats::get_avatars_batch))
        .route("/chats/mark-read/:chat_id", post(chats::mark_as_read))
        .route("/chats/typing/:chat_id", post(chats::send_typing))
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages/send", post(messages::send_message))
        .route("/messages/edit", put(messages::edit_message))
        .route("/messages/delete", delete(messages::delete_messages))
        .route("/messages/forward", post(messages::forward_messages))
        .route("/messages/:chat_id", get(messages::get_messages))
}

/// Media routes
fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/media/upload", post(media::upload_and_send))
        .route(
            "/media/download/:chat_id/:message_id",
            get(media::download_media),
        )
        .route(
            "/media/preview/:chat_id/:message_id",
            get(media::get_media_preview),
        )
}
