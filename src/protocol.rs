use std::path::PathBuf;

use crate::avatar::EncodedAvatar;
use crate::error::ClientError;
use crate::transport::{SessionChatMessage, TypingPresence};

/// Actions sent from the UI to the Backend
#[derive(Debug, Clone)]
pub enum BackendAction {
    /// Open a fresh session, replacing any existing one
    Connect,
    /// Create a room and join it
    CreateRoom {
        nickname: String,
        icon: Option<String>,
    },
    /// Join an existing room
    JoinRoom {
        nickname: String,
        room_id: String,
        icon: Option<String>,
    },
    /// Send a chat message to the current room
    SendMessage { body: String },
    /// Typing presence (best effort)
    SetTyping(bool),
    /// Compress the picked image into an avatar
    CompressAvatar(PathBuf),
    /// Leave the room: tear down and reconnect
    Leave,
    /// Tear down and stop the backend
    Shutdown,
}

/// Events sent from the Backend to the UI
#[derive(Debug)]
pub enum GuiEvent {
    /// Session is ready for room operations
    ConnectionReady,
    /// Session was closed by the service
    ConnectionClosed,
    /// Room created (we are its first member)
    RoomCreated { room_id: String },
    /// Joined an existing room, with its history
    RoomJoined {
        room_id: String,
        messages: Vec<SessionChatMessage>,
    },
    /// A chat message arrived in the current room
    MessageReceived(SessionChatMessage),
    /// Someone's typing state changed
    TypingPresence(TypingPresence),
    /// Avatar compression finished
    AvatarReady(EncodedAvatar),
    /// A recoverable failure to show the user
    Error(ClientError),
}
