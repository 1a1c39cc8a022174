//! WebSocket handler
//!
//! Upgrades `/ws?session_id=…`, wires the socket into the connection
//! registry, makes sure the session's update pump is running, and processes
//! inbound frames until the peer disconnects.

use axum::{
    extract::{ws::Message, Query, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::dispatch::dispatch;
use crate::protocol::Envelope;
use crate::state::GatewayState;
use crate::updates::spawn_update_pump;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

/// Query parameters of the WebSocket endpoint.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub session_id: String,
}

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket, query.session_id))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: axum::extract::ws::WebSocket, session_id: String) {
    let (tx, mut rx) = mpsc::channel::<Envelope>(MESSAGE_BUFFER_SIZE);
    let connection_id = state.connections().add_connection(&session_id, tx);

    tracing::info!(session_id = %session_id, connection_id = %connection_id, "WebSocket connection established");

    // Start the update pump if the session has (or can restore) a client.
    match state.context().registry().get_or_restore(&session_id).await {
        Ok(client) => {
            let pump_state = state.clone();
            let pump_session = session_id.clone();
            state.connections().ensure_pump(&session_id, move || {
                spawn_update_pump(client, pump_session, pump_state)
            });
        }
        Err(e) => {
            // A socket may attach before login completes; events start
            // flowing once a later connection finds a live client.
            tracing::debug!(session_id = %session_id, error = %e, "No client for session yet");
        }
    }

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Clone state for the receive task
    let recv_state = state.clone();
    let session_id_recv = session_id.clone();

    // Task: client frames → dispatcher
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => match Envelope::from_json(&text) {
                    Ok(envelope) => {
                        dispatch(&recv_state, &session_id_recv, connection_id, envelope).await;
                    }
                    Err(e) => {
                        tracing::debug!(
                            session_id = %session_id_recv,
                            error = %e,
                            "Ignoring malformed frame"
                        );
                    }
                },
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    break;
                }
                Ok(_) => {
                    // Binary/ping/pong frames carry nothing for us.
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id_recv, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    let session_id_send = session_id.clone();

    // Task: queued events → socket
    let send_task = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            if let Ok(json) = envelope.to_json() {
                if ws_sink.send(Message::Text(json)).await.is_err() {
                    tracing::warn!(
                        session_id = %session_id_send,
                        "Failed to send event to WebSocket"
                    );
                    break;
                }
            }
        }
        let _ = ws_sink.close().await;
    });

    // Wait for either direction to finish
    tokio::select! {
        _ = recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
        }
    }

    // Clean up; the last socket of a session takes the update pump with it.
    if state.connections().remove_connection(&session_id, connection_id) {
        state.connections().stop_pump(&session_id);
    }
    tracing::info!(session_id = %session_id, connection_id = %connection_id, "WebSocket connection closed");
}
