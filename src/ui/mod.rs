//! UI rendering modules for the party chat client.
//!
//! - `theme`: color schemes, global style, initials avatars
//! - `avatars`: texture cache for avatar data URIs
//! - `messages`: the chat message list
//! - `toasts`: transient status notifications

pub mod avatars;
pub mod messages;
pub mod theme;
pub mod toasts;

pub use avatars::{render_avatar, AvatarTextures};
pub use messages::render_messages;
pub use theme::{apply_app_style, ChatTheme};
pub use toasts::render_status_toasts;
