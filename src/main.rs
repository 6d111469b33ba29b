//! Nimbus - Telegram weather bot.
//!
//! Answers inline weather queries, keeps per-user language preferences and
//! gives developers broadcast and group listing tools.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB integration (users and chats)
//! - `cache` - Moka caches behind a registry
//! - `i18n` - Embedded translations
//! - `broadcast` - Fan-out of one message to many recipients
//! - `listing` - Paged listings with inline navigation
//! - `weather` - Weather provider client and report formatting
//! - `bot` - Core bot functionality (with Throttle for API rate limiting)
//! - `plugins` - Command, callback and inline handlers
//! - `events` - Membership event handlers
//! - `utils` - Utility functions

mod bot;
mod broadcast;
mod cache;
mod config;
mod database;
mod events;
mod i18n;
mod listing;
mod plugins;
mod utils;
mod weather;

use once_cell::sync::Lazy;
use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::{AppState, lifecycle};
use cache::CacheRegistry;
use config::Config;
use database::Database;
use weather::WeatherClient;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Lazy::force(&bot::STARTED_AT);

    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nimbus=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Nimbus bot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    i18n::init();

    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    info!("Database connected");

    let cache = CacheRegistry::new();
    let weather = WeatherClient::new(&config.weather_base_url, &config.weather_api_key)?;

    // Throttle respects Telegram's limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    let bot_username = config
        .bot_username
        .clone()
        .unwrap_or_else(|| me.username().to_string());
    info!("Using bot username: @{}", bot_username);

    if config.dev_ids.is_empty() {
        info!("No developer IDs configured (DEV_USERS is empty)");
    } else {
        info!("Developers: {:?}", config.dev_ids);
    }

    let state = AppState::new(&db, &cache, weather, &config, bot_username);

    if let Err(e) = lifecycle::register_commands(&bot).await {
        tracing::warn!("Failed to register command menus: {}", e);
    }
    lifecycle::announce(&bot, &state, "log.online").await;

    let reporter = config.status_chat_id.map(|chat_id| {
        lifecycle::spawn_status_reporter(
            bot.clone(),
            state.clone(),
            ChatId(chat_id),
            config.status_timezone,
            config.status_hour,
        )
    });

    let dispatcher = bot::build_dispatcher(bot.clone(), state.clone());
    bot::run(&config, bot.clone(), dispatcher).await?;

    // Dispatch returns after Ctrl+C
    if let Some(reporter) = reporter {
        reporter.abort();
    }
    lifecycle::announce(&bot, &state, "log.offline").await;
    info!("Nimbus stopped");

    Ok(())
}
