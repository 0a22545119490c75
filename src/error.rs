//! Client-level error taxonomy.
//!
//! `Display` is the text shown in the UI's error slot; `source()` keeps the cause for logs.

use thiserror::Error;

use crate::avatar::AvatarError;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to create room: {0}")]
    RoomCreateFailed(#[source] TransportError),

    #[error("Failed to join room: {0}")]
    RoomJoinFailed(#[source] TransportError),

    #[error("Failed to send message: {0}")]
    SendFailed(#[source] TransportError),

    #[error(transparent)]
    Avatar(#[from] AvatarError),
}
