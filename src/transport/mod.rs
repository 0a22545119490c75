//! Capability interface to the real-time messaging service.
//!
//! The backend only ever talks to the service through these traits:
//! - `Connector`: opens a session and wires its event stream
//! - `ChatTransport`: room operations and outbound messages on an open session
//! - `local`: an in-process room hub implementing both

mod local;
mod types;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

pub use local::{LocalHub, LocalTransport};
pub use types::{MessageList, SessionChatMessage, TypingPresence};

/// Notifications pushed by an open session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ConnectionReady,
    ConnectionClosed,
    ChatMessage(SessionChatMessage),
    TypingPresence(TypingPresence),
}

pub type SessionEventSender = UnboundedSender<SessionEvent>;

/// Outbound message kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutgoingMessage {
    #[serde(rename = "sendMessage")]
    Chat { body: String },
    #[serde(rename = "setTypingPresence")]
    Typing { typing: bool },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,
    #[error("room {0} does not exist")]
    UnknownRoom(String),
    #[error("not in a room")]
    NotInRoom,
    #[error("nickname must not be empty")]
    InvalidNickname,
}

/// Opens sessions. `events` receives every notification for the session's lifetime.
pub trait Connector: Send + Sync {
    fn connect(&self, events: SessionEventSender) -> Box<dyn ChatTransport>;
}

#[async_trait]
pub trait ChatTransport: Send {
    /// Create a room and join it, returning the new room id.
    async fn create_room(
        &mut self,
        nickname: &str,
        icon: Option<&str>,
    ) -> Result<String, TransportError>;

    /// Join an existing room, returning its history.
    async fn join_room(
        &mut self,
        nickname: &str,
        room_id: &str,
        icon: Option<&str>,
    ) -> Result<MessageList, TransportError>;

    /// Fire-and-forget send.
    fn send_message(&mut self, message: OutgoingMessage) -> Result<(), TransportError>;

    /// Release the session. Safe to call more than once.
    fn teardown(&mut self);
}
