//! Broadcast recipients and where they come from.

use std::future::Future;
use std::sync::Arc;

use teloxide::types::ChatId;

use crate::database::{ChatRepo, UserRepo};

/// Which collection a broadcast targets. A run never mixes kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    User,
    Chat,
}

impl RecipientKind {
    /// Catalog section used for this audience's texts.
    pub fn audience(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Chat => "groups",
        }
    }
}

/// A single broadcast target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipient {
    pub id: i64,
    pub kind: RecipientKind,
}

impl Recipient {
    pub fn user(id: i64) -> Self {
        Self { id, kind: RecipientKind::User }
    }

    pub fn chat(id: i64) -> Self {
        Self { id, kind: RecipientKind::Chat }
    }

    pub fn chat_id(&self) -> ChatId {
        ChatId(self.id)
    }
}

/// Supplies the ordered recipient snapshot for a run.
pub trait RecipientSource {
    fn snapshot(
        &self,
        kind: RecipientKind,
    ) -> impl Future<Output = anyhow::Result<Vec<Recipient>>> + Send;
}

/// MongoDB-backed recipient source.
#[derive(Clone)]
pub struct StoredRecipients {
    users: Arc<UserRepo>,
    chats: Arc<ChatRepo>,
}

impl StoredRecipients {
    pub fn new(users: Arc<UserRepo>, chats: Arc<ChatRepo>) -> Self {
        Self { users, chats }
    }
}

impl RecipientSource for StoredRecipients {
    async fn snapshot(&self, kind: RecipientKind) -> anyhow::Result<Vec<Recipient>> {
        let recipients = match kind {
            RecipientKind::User => self
                .users
                .all_ids()
                .await?
                .into_iter()
                .map(Recipient::user)
                .collect(),
            RecipientKind::Chat => self
                .chats
                .all()
                .await?
                .into_iter()
                .map(|chat| Recipient::chat(chat.chat_id))
                .collect(),
        };
        Ok(recipients)
    }
}
