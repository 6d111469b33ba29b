//! Startup and shutdown chores plus the daily status report.

use std::time::Instant;

use chrono::{DateTime, Days, TimeZone, Utc};
use chrono_tz::Tz;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, BotCommandScope, ParseMode};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::STARTED_AT;
use super::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{DEFAULT_LANG, LANGUAGES, get_text, get_text_with};
use crate::utils::format_uptime;

/// Commands shown in the private chat menu.
const PUBLIC_COMMANDS: &[&str] = &["start", "help", "lang", "ping", "stats"];

/// Register the localized command menus for private chats.
pub async fn register_commands(bot: &ThrottledBot) -> anyhow::Result<()> {
    bot.set_my_commands(localized_commands(DEFAULT_LANG))
        .scope(BotCommandScope::AllPrivateChats)
        .await?;

    for language in LANGUAGES {
        bot.set_my_commands(localized_commands(language.code))
            .scope(BotCommandScope::AllPrivateChats)
            .language_code(language.code)
            .await?;
    }

    info!("Registered command menus for {} languages", LANGUAGES.len());
    Ok(())
}

fn localized_commands(lang: &str) -> Vec<BotCommand> {
    PUBLIC_COMMANDS
        .iter()
        .map(|name| BotCommand::new(*name, get_text(lang, &format!("commands.{name}"))))
        .collect()
}

/// Post the online/offline notice (`log.online` / `log.offline`).
pub async fn announce(bot: &ThrottledBot, state: &AppState, key: &str) {
    state.notify_log(bot, get_text(DEFAULT_LANG, key)).await;
}

/// First moment strictly after `now` when the local clock in `tz` reads
/// `hour:00:00`. Days where that time does not exist are skipped.
pub fn next_run_after(now: DateTime<Utc>, tz: Tz, hour: u32) -> DateTime<Utc> {
    let today = now.with_timezone(&tz).date_naive();

    (0..3)
        .filter_map(|offset| {
            let day = today.checked_add_days(Days::new(offset))?;
            let local = day.and_hms_opt(hour, 0, 0)?;
            tz.from_local_datetime(&local).earliest()
        })
        .map(|at| at.with_timezone(&Utc))
        .find(|at| *at > now)
        .unwrap_or_else(|| now + chrono::Duration::days(1))
}

/// Spawn the daily status reporter.
pub fn spawn_status_reporter(
    bot: ThrottledBot,
    state: AppState,
    chat_id: ChatId,
    tz: Tz,
    hour: u32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let next = next_run_after(now, tz, hour);
            info!("Next status report at {}", next.with_timezone(&tz));

            tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

            if let Err(e) = send_status(&bot, &state, chat_id).await {
                warn!("Failed to send status report: {}", e);
            }
        }
    })
}

/// Send the status report: placeholder first, then ping, uptime and counts.
async fn send_status(bot: &ThrottledBot, state: &AppState, chat_id: ChatId) -> anyhow::Result<()> {
    let start = Instant::now();
    let sent = bot
        .send_message(chat_id, get_text(DEFAULT_LANG, "status.pending"))
        .await?;
    let latency = start.elapsed().as_millis();

    let (users, chats) = tokio::try_join!(state.users.count(), state.chats.count())?;

    let text = get_text_with(
        DEFAULT_LANG,
        "status.report",
        &[
            ("latency", &latency.to_string()),
            ("uptime", &format_uptime(STARTED_AT.elapsed())),
            ("users", &users.to_string()),
            ("chats", &chats.to_string()),
        ],
    );

    bot.edit_message_text(sent.chat.id, sent.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono_tz::America::Sao_Paulo;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        // 11:00 in São Paulo
        let next = next_run_after(utc(2024, 3, 5, 14, 0), Sao_Paulo, 12);
        assert_eq!(next, utc(2024, 3, 5, 15, 0));
    }

    #[test]
    fn test_next_run_tomorrow() {
        let next = next_run_after(utc(2024, 3, 5, 16, 30), Sao_Paulo, 12);
        assert_eq!(next, utc(2024, 3, 6, 15, 0));
    }

    #[test]
    fn test_next_run_at_exact_time_moves_on() {
        let next = next_run_after(utc(2024, 3, 5, 15, 0), Sao_Paulo, 12);
        assert_eq!(next, utc(2024, 3, 6, 15, 0));
    }

    #[test]
    fn test_localized_commands() {
        let commands = localized_commands("pt");
        assert_eq!(commands.len(), PUBLIC_COMMANDS.len());
        assert_eq!(commands[0].command, "start");
        assert_eq!(commands[0].description, "Menu principal");
    }
}
