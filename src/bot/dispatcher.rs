//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command, callback, inline and event
//! handlers. The schema is built once; handlers never register other
//! handlers at runtime.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::warn;
use url::Url;

use crate::broadcast::StoredRecipients;
use crate::cache::CacheRegistry;
use crate::config::Config;
use crate::database::{ChatRepo, Database, UserRepo};
use crate::events;
use crate::listing::ListingBrowser;
use crate::plugins;
use crate::weather::WeatherClient;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registered users and their languages.
    pub users: Arc<UserRepo>,

    /// Groups the bot is a member of.
    pub chats: Arc<ChatRepo>,

    /// Recipient snapshots for broadcasts.
    pub recipients: StoredRecipients,

    /// Weather provider client.
    pub weather: WeatherClient,

    /// Live `/groups` listing sessions.
    pub listings: ListingBrowser,

    /// Developer user IDs (allowed to run admin commands).
    pub dev_ids: Arc<Vec<u64>>,

    /// Bot username (without @) for deep link construction.
    pub bot_username: String,

    /// Chat receiving new user / new group notices.
    pub log_chat_id: Option<ChatId>,

    /// Target of the support buttons.
    pub support_url: Option<Url>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: &Database,
        cache: &CacheRegistry,
        weather: WeatherClient,
        config: &Config,
        bot_username: String,
    ) -> Self {
        let users = Arc::new(UserRepo::new(db, cache));
        let chats = Arc::new(ChatRepo::new(db));
        let recipients = StoredRecipients::new(users.clone(), chats.clone());

        let support_url = config.support_url.as_deref().and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Ignoring invalid SUPPORT_URL {:?}: {}", raw, e);
                None
            }
        });

        Self {
            users,
            chats,
            recipients,
            weather,
            listings: ListingBrowser::new(cache),
            dev_ids: Arc::new(config.dev_ids.clone()),
            bot_username,
            log_chat_id: config.log_chat_id.map(ChatId),
            support_url,
        }
    }

    /// Check if a user is a developer.
    pub fn is_dev(&self, user_id: UserId) -> bool {
        self.dev_ids.contains(&user_id.0)
    }

    /// Language of the given user (default when unknown).
    pub async fn lang_of(&self, user_id: Option<i64>) -> String {
        match user_id {
            Some(id) => self.users.lang_of(id).await,
            None => crate::i18n::DEFAULT_LANG.to_string(),
        }
    }

    /// Deep link into a private chat with the bot.
    pub fn start_link(&self, param: &str) -> anyhow::Result<Url> {
        Ok(Url::parse(&format!("https://t.me/{}?start={}", self.bot_username, param))?)
    }

    /// Link that opens the "add to group" picker.
    pub fn add_group_link(&self) -> anyhow::Result<Url> {
        Ok(Url::parse(&format!("https://t.me/{}?startgroup=true", self.bot_username))?)
    }

    /// Post an HTML notice to the log chat, if one is configured.
    /// Failures are logged, never returned.
    pub async fn notify_log(&self, bot: &ThrottledBot, text: String) {
        let Some(chat_id) = self.log_chat_id else {
            return;
        };
        if let Err(e) = bot.send_message(chat_id, text).parse_mode(ParseMode::Html).await {
            warn!("Failed to send notice to log chat {}: {}", chat_id, e);
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    // Membership service messages first, then commands
    let message_handler = Update::filter_message()
        .branch(events::membership_handler())
        .branch(plugins::command_handler());

    dptree::entry()
        .branch(message_handler)
        .branch(plugins::callback_handler())
        .branch(plugins::inline_handler())
}
