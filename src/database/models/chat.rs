//! Stored group chat.

use serde::{Deserialize, Serialize};

/// A group the bot was added to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRecord {
    /// Telegram chat ID (negative for groups).
    pub chat_id: i64,
    pub chat_name: String,
    /// Public @username, if the group has one.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl ChatRecord {
    pub fn new(chat_id: i64, chat_name: impl Into<String>, username: Option<String>) -> Self {
        Self {
            chat_id,
            chat_name: chat_name.into(),
            username,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Groups and supergroups have negative IDs; private chats don't.
    pub fn is_group(&self) -> bool {
        self.chat_id < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_group() {
        assert!(ChatRecord::new(-100123, "Group", None).is_group());
        assert!(!ChatRecord::new(42, "Someone", None).is_group());
    }
}
