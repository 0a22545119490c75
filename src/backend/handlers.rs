//! Event handlers for backend actions and session events.

use std::ops::ControlFlow;

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use super::session::Session;
use crate::avatar;
use crate::error::ClientError;
use crate::protocol::{BackendAction, GuiEvent};
use crate::transport::{Connector, OutgoingMessage, SessionEvent, TransportError};

/// Handle a backend action from the GUI. `Break` stops the backend.
pub async fn handle_backend_action(
    action: BackendAction,
    session: &mut Option<Session>,
    connector: &dyn Connector,
    event_tx: &Sender<GuiEvent>,
) -> ControlFlow<()> {
    match action {
        BackendAction::Connect => {
            if let Some(old) = session.take() {
                old.close();
            }
            info!("connecting");
            *session = Some(Session::open(connector));
        }

        BackendAction::CreateRoom { nickname, icon } => {
            let result = match session {
                Some(s) => s.transport.create_room(&nickname, icon.as_deref()).await,
                None => Err(TransportError::NotConnected),
            };
            let event = match result {
                Ok(room_id) => GuiEvent::RoomCreated { room_id },
                Err(e) => {
                    warn!(error = %e, "create room failed");
                    GuiEvent::Error(ClientError::RoomCreateFailed(e))
                }
            };
            let _ = event_tx.send(event);
        }

        BackendAction::JoinRoom {
            nickname,
            room_id,
            icon,
        } => {
            let result = match session {
                Some(s) => {
                    s.transport
                        .join_room(&nickname, &room_id, icon.as_deref())
                        .await
                }
                None => Err(TransportError::NotConnected),
            };
            let event = match result {
                Ok(list) => GuiEvent::RoomJoined {
                    room_id,
                    messages: list.messages,
                },
                Err(e) => {
                    warn!(%room_id, error = %e, "join room failed");
                    GuiEvent::Error(ClientError::RoomJoinFailed(e))
                }
            };
            let _ = event_tx.send(event);
        }

        BackendAction::SendMessage { body } => {
            let result = match session {
                Some(s) => s.transport.send_message(OutgoingMessage::Chat { body }),
                None => Err(TransportError::NotConnected),
            };
            if let Err(e) = result {
                warn!(error = %e, "send failed");
                let _ = event_tx.send(GuiEvent::Error(ClientError::SendFailed(e)));
            }
        }

        BackendAction::SetTyping(typing) => {
            // Presence is best effort: failures never reach the user
            if let Some(s) = session {
                if let Err(e) = s.transport.send_message(OutgoingMessage::Typing { typing }) {
                    debug!(typing, error = %e, "typing presence not delivered");
                }
            }
        }

        BackendAction::CompressAvatar(path) => {
            let event_tx = event_tx.clone();
            tokio::spawn(async move {
                let event = match avatar::compress_file(&path).await {
                    Ok(encoded) => {
                        info!(path = %path.display(), len = encoded.len(), "avatar ready");
                        GuiEvent::AvatarReady(encoded)
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = ?e, "avatar rejected");
                        GuiEvent::Error(e.into())
                    }
                };
                let _ = event_tx.send(event);
            });
        }

        BackendAction::Leave => {
            if let Some(old) = session.take() {
                old.close();
            }
            info!("left room, reconnecting");
            *session = Some(Session::open(connector));
        }

        BackendAction::Shutdown => {
            if let Some(old) = session.take() {
                old.close();
            }
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

/// Translate a session notification for the GUI.
pub fn handle_session_event(event: SessionEvent) -> GuiEvent {
    match event {
        SessionEvent::ConnectionReady => GuiEvent::ConnectionReady,
        SessionEvent::ConnectionClosed => GuiEvent::ConnectionClosed,
        SessionEvent::ChatMessage(msg) => GuiEvent::MessageReceived(msg),
        SessionEvent::TypingPresence(presence) => GuiEvent::TypingPresence(presence),
    }
}
