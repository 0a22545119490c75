//! Data shapes exchanged with the messaging service.

use serde::{Deserialize, Serialize};

/// A chat entry as delivered by the service, either user-authored or a
/// server-synthesized system message ("alice joined the party").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChatMessage {
    #[serde(default)]
    pub is_system_message: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_nickname: Option<String>,
    pub body: String,
    /// Permanent id of the author's connection.
    pub perm_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// History returned when joining an existing room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<SessionChatMessage>,
}

/// Room-wide typing presence broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPresence {
    pub anyone_typing: bool,
    /// Permanent ids of everyone currently typing, the local user included.
    #[serde(default)]
    pub users_typing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_from_service_json() {
        let json = r#"{
            "isSystemMessage": false,
            "userNickname": "alice",
            "body": "hello",
            "permId": "p-1",
            "timestamp": 1700000000000
        }"#;
        let msg: SessionChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.user_nickname.as_deref(), Some("alice"));
        assert_eq!(msg.user_icon, None);
        assert!(!msg.is_system_message);
        assert_eq!(msg.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_typing_presence_field_names() {
        let presence = TypingPresence {
            anyone_typing: true,
            users_typing: vec!["p-1".into()],
        };
        let value = serde_json::to_value(&presence).unwrap();
        assert_eq!(value["anyoneTyping"], true);
        assert_eq!(value["usersTyping"][0], "p-1");
    }

    #[test]
    fn test_message_list_missing_messages_defaults_empty() {
        let list: MessageList = serde_json::from_str("{}").unwrap();
        assert!(list.messages.is_empty());
    }
}
