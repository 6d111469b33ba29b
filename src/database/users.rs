//! User repository.
//!
//! Users are registered on `/start`; their language is read on almost
//! every interaction, so it is cached.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use serde::Deserialize;
use teloxide::types::User;
use tracing::{debug, warn};

use super::Database;
use super::models::UserRecord;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::i18n::{self, DEFAULT_LANG};

/// Projection used when only IDs are needed.
#[derive(Debug, Deserialize)]
struct UserIdOnly {
    user_id: i64,
}

/// Repository for bot users with a cached language lookup.
pub struct UserRepo {
    collection: Collection<UserRecord>,
    lang_cache: TypedCache<i64, String>,
}

impl UserRepo {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("users"),
            lang_cache: cache.get_or_create("user_lang", CacheConfig::user_prefs()),
        }
    }

    /// Insert the user if unknown, refreshing name fields otherwise.
    ///
    /// Returns `true` when a new record was created.
    pub async fn register(&self, user: &User) -> Result<bool> {
        let record = UserRecord::from_telegram(user);
        let filter = doc! { "user_id": record.user_id };
        let update = doc! {
            "$set": {
                "first_name": record.first_name.clone(),
                "username": record.username.clone(),
            },
            "$setOnInsert": {
                "lang": record.lang.clone(),
                "created_at": record.created_at,
            },
        };
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(filter, update)
            .with_options(options)
            .await?;

        let created = result.upserted_id.is_some();
        debug!("Registered user {} (new: {})", record.user_id, created);
        Ok(created)
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: i64) -> Result<Option<UserRecord>> {
        let filter = doc! { "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Language of a user; unknown users and lookup errors give the default.
    pub async fn lang_of(&self, user_id: i64) -> String {
        if let Some(lang) = self.lang_cache.get(&user_id) {
            return lang;
        }

        match self.get(user_id).await {
            Ok(record) => {
                let lang = record
                    .map(|r| i18n::normalize(&r.lang))
                    .unwrap_or(DEFAULT_LANG)
                    .to_string();
                self.lang_cache.insert(user_id, lang.clone());
                lang
            }
            Err(e) => {
                warn!("Error fetching language of {}: {}", user_id, e);
                DEFAULT_LANG.to_string()
            }
        }
    }

    /// Store a new language. Returns `false` if the user is not registered.
    pub async fn set_lang(&self, user_id: i64, lang: &str) -> Result<bool> {
        let filter = doc! { "user_id": user_id };
        let update = doc! { "$set": { "lang": lang } };
        let result = self.collection.update_one(filter, update).await?;

        self.lang_cache.invalidate(&user_id);
        debug!("Set language of {} to {}", user_id, lang);
        Ok(result.matched_count > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    /// All user IDs ordered by ID.
    pub async fn all_ids(&self) -> Result<Vec<i64>> {
        let ids: Vec<UserIdOnly> = self
            .collection
            .clone_with_type::<UserIdOnly>()
            .find(doc! {})
            .projection(doc! { "user_id": 1, "_id": 0 })
            .sort(doc! { "user_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(ids.into_iter().map(|u| u.user_id).collect())
    }
}
