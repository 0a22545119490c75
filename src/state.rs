//! Core application state, separated from UI logic.
//!
//! `ClientState` holds everything the screens render: connection flags, form
//! fields, the current room and its messages. Requests to the backend are built
//! here so the rules (trimming, enablement) live in one place.

use std::time::Instant;

use crate::avatar::EncodedAvatar;
use crate::buffer::{ChatBuffer, IconCache};
use crate::protocol::BackendAction;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    Chat,
}

#[derive(Default)]
pub struct ClientState {
    /// Session ready for room operations.
    pub connection_ready: bool,

    /// The service closed the session; only a reload recovers.
    pub connection_closed: bool,

    pub screen: Screen,

    /// Landing form: nickname field.
    pub nickname: String,

    /// Landing form: compressed avatar, if one was picked.
    pub user_icon: Option<EncodedAvatar>,

    /// Landing form: room id to join.
    pub join_room_id: String,

    /// Nickname sent with the outstanding create/join request.
    pub pending_nickname: Option<String>,

    /// Room we are in.
    pub room_id: Option<String>,

    pub buffer: ChatBuffer,

    /// Chat view: message being composed.
    pub message_input: String,

    /// "<label> is typing..." when set.
    pub typing_label: Option<&'static str>,

    /// Single user-visible error slot.
    pub error: Option<String>,

    /// Icons we set for our own nicknames.
    pub icon_cache: IconCache,

    /// Status toast messages with creation time (auto-expire).
    pub status_messages: Vec<(String, Instant)>,
}

impl ClientState {
    pub fn new(nickname: String) -> Self {
        Self {
            nickname,
            ..Default::default()
        }
    }

    pub fn can_create_room(&self) -> bool {
        self.connection_ready && validation::validate_nickname(&self.nickname).is_ok()
    }

    pub fn can_join_room(&self) -> bool {
        self.can_create_room() && validation::validate_room_id(&self.join_room_id).is_ok()
    }

    pub fn can_send(&self) -> bool {
        validation::validate_message(&self.message_input).is_ok()
    }

    fn icon_payload(&self) -> Option<String> {
        self.user_icon.as_ref().map(|i| i.as_str().to_string())
    }

    /// Build a create-room request, or `None` if the form isn't ready.
    pub fn create_room_request(&mut self) -> Option<BackendAction> {
        if !self.connection_ready {
            return None;
        }
        let nickname = validation::validate_nickname(&self.nickname).ok()?.to_string();
        self.error = None;
        self.pending_nickname = Some(nickname.clone());
        Some(BackendAction::CreateRoom {
            nickname,
            icon: self.icon_payload(),
        })
    }

    /// Build a join-room request, or `None` if the form isn't ready.
    pub fn join_room_request(&mut self) -> Option<BackendAction> {
        if !self.connection_ready {
            return None;
        }
        let nickname = validation::validate_nickname(&self.nickname).ok()?.to_string();
        let room_id = validation::validate_room_id(&self.join_room_id)
            .ok()?
            .to_string();
        self.error = None;
        self.pending_nickname = Some(nickname.clone());
        Some(BackendAction::JoinRoom {
            nickname,
            room_id,
            icon: self.icon_payload(),
        })
    }

    /// Take the composed message for sending; clears the input.
    pub fn send_message_request(&mut self) -> Option<BackendAction> {
        let body = validation::validate_message(&self.message_input)
            .ok()?
            .to_string();
        self.message_input.clear();
        Some(BackendAction::SendMessage { body })
    }

    /// Room entered: remember our icon under the nickname we used.
    pub fn enter_room(&mut self, room_id: String) {
        if let (Some(nick), Some(icon)) = (self.pending_nickname.take(), self.user_icon.as_ref()) {
            self.icon_cache.insert(nick, icon.as_str().to_string());
        }
        self.room_id = Some(room_id);
        self.screen = Screen::Chat;
    }

    /// Back to the landing form; the session is being replaced.
    pub fn leave_room(&mut self) {
        self.screen = Screen::Landing;
        self.room_id = None;
        self.pending_nickname = None;
        self.buffer.clear();
        self.message_input.clear();
        self.typing_label = None;
        self.error = None;
        self.connection_ready = false;
        self.connection_closed = false;
    }

    pub fn push_status(&mut self, text: impl Into<String>) {
        self.status_messages.push((text.into(), Instant::now()));
    }

    /// Purge status messages older than the given duration.
    pub fn purge_old_status_messages(&mut self, max_age_secs: u64) {
        self.status_messages
            .retain(|(_, created)| created.elapsed().as_secs() < max_age_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(nick: &str) -> ClientState {
        let mut state = ClientState::new(nick.to_string());
        state.connection_ready = true;
        state
    }

    #[test]
    fn test_client_state_new() {
        let state = ClientState::new("alice".into());
        assert_eq!(state.screen, Screen::Landing);
        assert!(!state.connection_ready);
        assert!(!state.can_create_room());
        assert_eq!(state.nickname, "alice");
    }

    #[test]
    fn test_create_room_request_trims_and_clears_error() {
        let mut state = ready("  alice ");
        state.error = Some("old".into());
        match state.create_room_request() {
            Some(BackendAction::CreateRoom { nickname, icon }) => {
                assert_eq!(nickname, "alice");
                assert_eq!(icon, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.error, None);
        assert_eq!(state.pending_nickname.as_deref(), Some("alice"));
    }

    #[test]
    fn test_requests_need_connection_and_fields() {
        let mut state = ClientState::new("alice".into());
        assert!(state.create_room_request().is_none());

        let mut state = ready("   ");
        assert!(state.create_room_request().is_none());

        let mut state = ready("alice");
        assert!(!state.can_join_room());
        assert!(state.join_room_request().is_none());
        state.join_room_id = " room-1 ".into();
        assert!(state.can_join_room());
        assert!(matches!(
            state.join_room_request(),
            Some(BackendAction::JoinRoom { room_id, .. }) if room_id == "room-1"
        ));
    }

    #[test]
    fn test_send_message_request() {
        let mut state = ready("alice");
        state.message_input = "   ".into();
        assert!(!state.can_send());
        assert!(state.send_message_request().is_none());

        state.message_input = " hello ".into();
        assert!(matches!(
            state.send_message_request(),
            Some(BackendAction::SendMessage { body }) if body == "hello"
        ));
        assert!(state.message_input.is_empty());
    }

    #[test]
    fn test_leave_room_resets_chat() {
        let mut state = ready("alice");
        state.enter_room("r1".into());
        state.message_input = "draft".into();
        state.typing_label = Some("Someone");
        state.error = Some("oops".into());

        state.leave_room();
        assert_eq!(state.screen, Screen::Landing);
        assert_eq!(state.room_id, None);
        assert!(state.buffer.is_empty());
        assert_eq!(state.typing_label, None);
        assert_eq!(state.error, None);
        assert!(!state.connection_ready);
        // Form fields survive
        assert_eq!(state.nickname, "alice");
    }

    #[test]
    fn test_purge_status_messages() {
        let mut state = ClientState::default();
        state.push_status("Room ID copied");
        state.purge_old_status_messages(4);
        assert_eq!(state.status_messages.len(), 1);
        state.purge_old_status_messages(0);
        assert!(state.status_messages.is_empty());
    }
}
