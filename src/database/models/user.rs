//! Stored bot user.

use serde::{Deserialize, Serialize};
use teloxide::types::User;

use crate::i18n::DEFAULT_LANG;

/// A user who started the bot in private.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    /// Telegram user ID.
    pub user_id: i64,
    pub first_name: String,
    /// Username without @.
    #[serde(default)]
    pub username: Option<String>,
    /// Preferred language code.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Unix timestamp of registration.
    #[serde(default)]
    pub created_at: i64,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl UserRecord {
    /// Create a new record for a Telegram user.
    pub fn from_telegram(user: &User) -> Self {
        Self {
            user_id: user.id.0 as i64,
            first_name: user.first_name.clone(),
            username: user.username.clone(),
            lang: default_lang(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, from_document};

    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: UserRecord = from_document(doc! { "user_id": 5_i64, "first_name": "Ana" }).unwrap();
        assert_eq!(record.lang, DEFAULT_LANG);
        assert!(record.username.is_none());
        assert_eq!(record.created_at, 0);
    }
}
