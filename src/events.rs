//! Backend event processing (room entry, messages, presence, errors).

use tracing::{debug, info};

use crate::protocol::GuiEvent;
use crate::state::ClientState;
use crate::transport::TypingPresence;

/// Who to show in the typing indicator.
///
/// The presence list includes us, so while we type a single entry is just
/// ourselves and only a longer list means someone else is typing too.
pub fn typing_label(presence: &TypingPresence, self_typing: bool) -> Option<&'static str> {
    if !presence.anyone_typing || presence.users_typing.is_empty() {
        return None;
    }
    if !self_typing {
        return Some("Someone");
    }
    if presence.users_typing.len() > 1 {
        Some("Others")
    } else {
        None
    }
}

/// Apply one backend event to the state. `self_typing` is the presence we last
/// transmitted.
pub fn process_single_event(state: &mut ClientState, event: GuiEvent, self_typing: bool) {
    match event {
        GuiEvent::ConnectionReady => {
            state.connection_ready = true;
            state.connection_closed = false;
        }

        GuiEvent::ConnectionClosed => {
            state.connection_closed = true;
            state.connection_ready = false;
        }

        GuiEvent::RoomCreated { room_id } => {
            info!(%room_id, "entered new room");
            state.enter_room(room_id);
        }

        GuiEvent::RoomJoined { room_id, messages } => {
            info!(%room_id, history = messages.len(), "joined room");
            state.buffer.replace(messages);
            state.enter_room(room_id);
        }

        GuiEvent::MessageReceived(msg) => {
            state.buffer.add_message(msg);
        }

        GuiEvent::TypingPresence(presence) => {
            state.typing_label = typing_label(&presence, self_typing);
        }

        GuiEvent::AvatarReady(avatar) => {
            debug!(len = avatar.len(), quality = avatar.quality(), "avatar set");
            state.user_icon = Some(avatar);
            state.error = None;
        }

        GuiEvent::Error(err) => {
            state.error = Some(err.to_string());
        }
    }
}
