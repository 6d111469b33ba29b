//! Group chat repository.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{doc, to_document};
use mongodb::options::UpdateOptions;
use tracing::debug;

use super::Database;
use super::models::ChatRecord;

/// Repository for the groups the bot is a member of.
pub struct ChatRepo {
    collection: Collection<ChatRecord>,
}

impl ChatRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("chats"),
        }
    }

    /// Record a group if it is not known yet.
    ///
    /// Returns `true` when a new record was created.
    pub async fn register(&self, record: &ChatRecord) -> Result<bool> {
        let filter = doc! { "chat_id": record.chat_id };
        let update = doc! { "$setOnInsert": to_document(record)? };
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(filter, update)
            .with_options(options)
            .await?;

        let created = result.upserted_id.is_some();
        debug!("Registered chat {} (new: {})", record.chat_id, created);
        Ok(created)
    }

    /// Delete a group. Returns the removed record, if any.
    pub async fn remove(&self, chat_id: i64) -> Result<Option<ChatRecord>> {
        let filter = doc! { "chat_id": chat_id };
        let removed = self.collection.find_one_and_delete(filter).await?;
        debug!("Removed chat {}: {}", chat_id, removed.is_some());
        Ok(removed)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    /// All chats ordered by ID.
    pub async fn all(&self) -> Result<Vec<ChatRecord>> {
        let chats = self
            .collection
            .find(doc! {})
            .sort(doc! { "chat_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(chats)
    }
}
