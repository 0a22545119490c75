//! Form input validation
//!
//! Each validator returns the trimmed value that should actually be sent.

/// Longest nickname the landing form accepts
pub const MAX_NICKNAME_LEN: usize = 20;

/// Validates a nickname for creating or joining a room
pub fn validate_nickname(nick: &str) -> Result<&str, String> {
    let nick = nick.trim();
    if nick.is_empty() {
        return Err("Nickname cannot be empty".to_string());
    }
    if nick.chars().count() > MAX_NICKNAME_LEN {
        return Err(format!(
            "Nickname too long (max {} characters)",
            MAX_NICKNAME_LEN
        ));
    }
    Ok(nick)
}

/// Validates a room id typed into the join form
pub fn validate_room_id(room_id: &str) -> Result<&str, String> {
    let room_id = room_id.trim();
    if room_id.is_empty() {
        return Err("Room ID cannot be empty".to_string());
    }
    Ok(room_id)
}

/// Validates a chat message body
pub fn validate_message(body: &str) -> Result<&str, String> {
    let body = body.trim();
    if body.is_empty() {
        return Err("Message cannot be empty".to_string());
    }
    Ok(body)
}
