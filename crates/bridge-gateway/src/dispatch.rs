//! Inbound command dispatch
//!
//! Maps client frames onto the message/chat services. Message commands
//! report failures back over the socket as `error` events; read receipts and
//! typing indicators fail silently.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use bridge_telegram::{ChatService, MessageService};

use crate::protocol::{
    commands, events, ChatParams, DeleteMessageParams, EditMessageParams, Envelope, ErrorEvent,
    SendMessageParams,
};
use crate::state::GatewayState;

/// Handle one inbound frame.
pub async fn dispatch(
    state: &GatewayState,
    session_id: &str,
    connection_id: Uuid,
    envelope: Envelope,
) {
    match envelope.event.as_str() {
        commands::SEND_MESSAGE => handle_send_message(state, session_id, envelope.data).await,
        commands::EDIT_MESSAGE => handle_edit_message(state, session_id, envelope.data).await,
        commands::DELETE_MESSAGE => handle_delete_message(state, session_id, envelope.data).await,
        commands::MARK_READ => handle_mark_read(state, session_id, envelope.data).await,
        commands::START_TYPING => handle_typing(state, session_id, envelope.data).await,
        commands::PING => {
            state
                .connections()
                .send_to_connection(
                    connection_id,
                    Envelope::new(events::PONG, serde_json::json!({})),
                )
                .await;
        }
        other => {
            debug!(session_id = %session_id, event = other, "Unknown client event");
        }
    }
}

async fn handle_send_message(state: &GatewayState, session_id: &str, data: Value) {
    let Ok(params) = serde_json::from_value::<SendMessageParams>(data) else {
        return;
    };
    // The echo arrives through the update stream, not as a direct reply.
    if let Err(e) = MessageService::new(state.context())
        .send(session_id, params.chat_id, &params.text, params.reply_to)
        .await
    {
        report_error(state, session_id, commands::SEND_MESSAGE, &e.to_string()).await;
    }
}

async fn handle_edit_message(state: &GatewayState, session_id: &str, data: Value) {
    let Ok(params) = serde_json::from_value::<EditMessageParams>(data) else {
        return;
    };
    if let Err(e) = MessageService::new(state.context())
        .edit(session_id, params.chat_id, params.message_id, &params.text)
        .await
    {
        report_error(state, session_id, commands::EDIT_MESSAGE, &e.to_string()).await;
    }
}

async fn handle_delete_message(state: &GatewayState, session_id: &str, data: Value) {
    let Ok(params) = serde_json::from_value::<DeleteMessageParams>(data) else {
        return;
    };
    if params.message_ids.is_empty() {
        return;
    }
    if let Err(e) = MessageService::new(state.context())
        .delete(session_id, params.chat_id, params.message_ids)
        .await
    {
        report_error(state, session_id, commands::DELETE_MESSAGE, &e.to_string()).await;
    }
}

async fn handle_mark_read(state: &GatewayState, session_id: &str, data: Value) {
    let Ok(params) = serde_json::from_value::<ChatParams>(data) else {
        return;
    };
    // Silent fail: a missed read receipt is not worth surfacing.
    ChatService::new(state.context())
        .mark_read(session_id, params.chat_id)
        .await
        .ok();
}

async fn handle_typing(state: &GatewayState, session_id: &str, data: Value) {
    let Ok(params) = serde_json::from_value::<ChatParams>(data) else {
        return;
    };
    // Silent fail, same as read receipts.
    ChatService::new(state.context())
        .send_typing(session_id, params.chat_id)
        .await
        .ok();
}

async fn report_error(state: &GatewayState, session_id: &str, action: &str, error: &str) {
    state
        .connections()
        .send_to_session(
            session_id,
            Envelope::new(
                events::ERROR,
                ErrorEvent {
                    action: action.to_string(),
                    error: error.to_string(),
                },
            ),
        )
        .await;
}
