//! Update pump
//!
//! One task per session: consumes the library's update stream and fans the
//! interesting events out to every socket of that session. Updates with no
//! high-level representation (raw TL updates, inline/callback queries) are
//! not forwarded.

use layer_client::update::Update;
use layer_client::Client;
use tokio::task::JoinHandle;
use tracing::debug;

use bridge_telegram::{format, peer};

use crate::protocol::{events, Envelope, MessageDeletedEvent};
use crate::state::GatewayState;

/// Spawn the update pump for one session.
pub fn spawn_update_pump(client: Client, session_id: String, state: GatewayState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut updates = client.stream_updates();
        debug!(session_id = %session_id, "Update pump started");

        while let Some(update) = updates.next().await {
            let envelope = match update {
                Update::NewMessage(message) => {
                    format::message_view(&message.raw, state.context().directory())
                        .map(|view| Envelope::new(events::NEW_MESSAGE, view))
                }
                Update::MessageEdited(message) => {
                    format::message_view(&message.raw, state.context().directory())
                        .map(|view| Envelope::new(events::MESSAGE_EDITED, view))
                }
                Update::MessageDeleted(deletion) => Some(Envelope::new(
                    events::MESSAGE_DELETED,
                    MessageDeletedEvent {
                        chat_id: deletion.channel_id.map(peer::mark_channel),
                        message_ids: deletion.message_ids,
                    },
                )),
                _ => None,
            };

            if let Some(envelope) = envelope {
                state.connections().send_to_session(&session_id, envelope).await;
            }
        }

        debug!(session_id = %session_id, "Update pump ended");
    })
}
