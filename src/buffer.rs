use std::collections::HashMap;

use chrono::{Local, TimeZone};

use crate::transport::SessionChatMessage;

/// Maximum messages to keep in the buffer before trimming
const MAX_BUFFER_MESSAGES: usize = 2000;
/// Number of oldest messages to remove when trimming
const BUFFER_TRIM_COUNT: usize = 500;

/// Icons shorter than this are placeholders, not real images
const MIN_ICON_LEN: usize = 100;

/// Nickname -> avatar data URI for icons we set ourselves
pub type IconCache = HashMap<String, String>;

/// What the message list draws for one entry
#[derive(Clone, Debug, PartialEq)]
pub enum RenderedMessage {
    System {
        text: String,
    },
    User {
        author: String,
        initials: String,
        time: String,
        body: String,
        icon: Option<String>,
    },
}

impl RenderedMessage {
    pub fn from_message(msg: &SessionChatMessage, icons: &IconCache) -> Self {
        if msg.is_system_message {
            return RenderedMessage::System {
                text: system_text(msg),
            };
        }
        let author = msg.user_nickname.clone().unwrap_or_default();
        RenderedMessage::User {
            initials: initials(msg.user_nickname.as_deref().unwrap_or("U")),
            author,
            time: format_time(msg.timestamp),
            body: msg.body.clone(),
            icon: resolve_icon(msg, icons).map(str::to_string),
        }
    }
}

/// Messages of the current room, oldest first
#[derive(Default, Clone, Debug)]
pub struct ChatBuffer {
    pub messages: Vec<SessionChatMessage>,
}

impl ChatBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, msg: SessionChatMessage) {
        self.messages.push(msg);
        // Trim old messages if buffer gets too large
        if self.messages.len() > MAX_BUFFER_MESSAGES {
            self.messages.drain(0..BUFFER_TRIM_COUNT);
        }
    }

    /// Replace everything with a room's history
    pub fn replace(&mut self, history: Vec<SessionChatMessage>) {
        self.messages = history;
        if self.messages.len() > MAX_BUFFER_MESSAGES {
            let excess = self.messages.len() - MAX_BUFFER_MESSAGES;
            self.messages.drain(0..excess);
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Up to two uppercase initials, one per space-separated word
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
        .chars()
        .take(2)
        .collect()
}

/// Local 24-hour HH:MM for a millisecond timestamp
pub fn format_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// "alice joined the party", or just the body when no author is known
pub fn system_text(msg: &SessionChatMessage) -> String {
    match msg.user_nickname.as_deref() {
        Some(nick) if !nick.is_empty() => format!("{} {}", nick, msg.body),
        _ => msg.body.clone(),
    }
}

/// Our own cached icon wins over whatever the message carries
pub fn resolve_icon<'a>(msg: &'a SessionChatMessage, icons: &'a IconCache) -> Option<&'a str> {
    if msg.is_system_message {
        return None;
    }
    let nick = msg.user_nickname.as_deref().filter(|n| !n.is_empty())?;

    if let Some(local) = icons.get(nick).filter(|i| i.len() > MIN_ICON_LEN) {
        return Some(local.as_str());
    }
    msg.user_icon
        .as_deref()
        .filter(|i| i.len() > MIN_ICON_LEN)
}
