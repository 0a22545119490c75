//! Application module structure for PartyChatApp
//!
//! - `core`: PartyChatApp struct, initialization and user actions
//! - `events`: Event processing from backend
//! - `update`: Main update loop
//! - `ui::landing`: Nickname, avatar and room forms
//! - `ui::chat`: Room header, messages, typing indicator and input
//! - `ui::overlay`: Connection lost overlay

pub mod core;
pub mod events;
pub mod update;
pub mod ui;

pub use core::PartyChatApp;
