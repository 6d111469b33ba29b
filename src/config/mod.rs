//! Configuration module for Nimbus.
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

/// Default OpenWeatherMap "current weather" endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Bot running mode
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Bot username (without @) for deep link construction.
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    /// Developer user IDs (comma-separated).
    /// These users can run the administrative commands.
    pub dev_ids: Vec<u64>,

    /// Chat that receives new user / new group / online notices.
    pub log_chat_id: Option<i64>,

    /// Chat that receives the daily status report.
    pub status_chat_id: Option<i64>,
    pub status_timezone: Tz,
    pub status_hour: u32,

    /// Link behind the "support" buttons; buttons are hidden when unset.
    pub support_url: Option<String>,

    // Weather
    pub weather_api_key: String,
    pub weather_base_url: String,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_mode = match optional("BOT_MODE")
            .unwrap_or_else(|| "polling".to_string())
            .to_lowercase()
            .as_str()
        {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = optional("WEBHOOK_URL");
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::Missing("WEBHOOK_URL"));
        }

        // Parse bot username (strip @ if present)
        let bot_username = optional("BOT_USERNAME")
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            bot_mode,
            webhook_url,
            webhook_port: parsed("WEBHOOK_PORT")?.unwrap_or(8443),
            webhook_secret: optional("WEBHOOK_SECRET"),
            bot_username,
            dev_ids: parse_id_list(&optional("DEV_USERS").unwrap_or_default()),
            log_chat_id: parsed("LOG_CHAT_ID")?,
            status_chat_id: parsed("STATUS_CHAT_ID")?,
            status_timezone: parsed("STATUS_TIMEZONE")?.unwrap_or(chrono_tz::America::Sao_Paulo),
            status_hour: parsed::<u32>("STATUS_HOUR")?.unwrap_or(12).min(23),
            support_url: optional("SUPPORT_URL"),
            weather_api_key: required("WEATHER_API_KEY")?,
            weather_base_url: optional("WEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_database: optional("MONGODB_DATABASE").unwrap_or_else(|| "nimbus".to_string()),
        })
    }
}

/// Parse a comma-separated list of user IDs, skipping malformed entries.
pub fn parse_id_list(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect()
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match optional(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,abc,,3"), vec![1, 2, 3]);
        assert!(parse_id_list("").is_empty());
    }

    #[test]
    fn test_bot_mode_default() {
        assert_eq!(BotMode::default(), BotMode::Polling);
    }
}
