//! /start command plugin.
//!
//! Registers the user and shows the main menu. Also routes the
//! `menu:*` callbacks shared by the start, help and language screens.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, User};
use tracing::{info, warn};

use super::{help, lang};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{DEFAULT_LANG, get_text, get_text_with};
use crate::utils::{html_escape, no_preview, user_mention};

/// Handle the /start command with an optional deep link parameter.
pub async fn start_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    register_user(&bot, &state, user).await;
    let locale = state.users.lang_of(user.id.0 as i64).await;

    let (text, keyboard) = match args.trim() {
        "lang" => (get_text(&locale, "lang.choose"), lang::language_keyboard(&locale)),
        "help" => (help::help_text(&state, &locale), help::help_keyboard(&locale)),
        _ => (
            start_text(&state, &user.first_name, &locale),
            start_keyboard(&state, &locale)?,
        ),
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

/// Handle `menu:start`, `menu:help` and `menu:lang` callbacks.
pub async fn menu_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let target = q.data.as_deref().and_then(|d| d.strip_prefix("menu:"));

    let Some(message) = q.message.as_ref().filter(|m| m.chat().is_private()) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let locale = state.users.lang_of(q.from.id.0 as i64).await;
    let (text, keyboard) = match target {
        Some("start") => (
            start_text(&state, &q.from.first_name, &locale),
            start_keyboard(&state, &locale)?,
        ),
        Some("help") => (help::help_text(&state, &locale), help::help_keyboard(&locale)),
        Some("lang") => (get_text(&locale, "lang.choose"), lang::language_keyboard(&locale)),
        _ => {
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
    };

    bot.edit_message_text(message.chat().id, message.id(), text)
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .reply_markup(keyboard)
        .await?;

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

/// Main menu text.
pub fn start_text(state: &AppState, first_name: &str, locale: &str) -> String {
    get_text_with(
        locale,
        "menu.start",
        &[("name", &html_escape(first_name)), ("bot", &state.bot_username)],
    )
}

/// Main menu keyboard: inline search, add to group, help and language.
pub fn start_keyboard(state: &AppState, locale: &str) -> anyhow::Result<InlineKeyboardMarkup> {
    Ok(InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::switch_inline_query_current_chat(
            get_text(locale, "menu.inline_search"),
            "",
        )],
        vec![InlineKeyboardButton::url(
            get_text(locale, "menu.add_group"),
            state.add_group_link()?,
        )],
        vec![
            InlineKeyboardButton::callback(get_text(locale, "menu.help"), "menu:help"),
            InlineKeyboardButton::callback(get_text(locale, "menu.language"), "menu:lang"),
        ],
    ]))
}

/// Store the user; first-time users are announced in the log chat.
async fn register_user(bot: &ThrottledBot, state: &AppState, user: &User) {
    let user_id = user.id.0 as i64;

    match state.users.register(user).await {
        Ok(true) => {
            info!("New user registered: {} ({})", user.first_name, user_id);

            let username = match &user.username {
                Some(name) => format!("@{}", name),
                None => get_text(DEFAULT_LANG, "log.no_username"),
            };
            let text = get_text_with(
                DEFAULT_LANG,
                "log.new_user",
                &[
                    ("mention", &user_mention(user_id, &user.first_name)),
                    ("id", &user_id.to_string()),
                    ("username", &username),
                ],
            );
            state.notify_log(bot, text).await;
        }
        Ok(false) => {}
        Err(e) => warn!("Failed to register user {}: {}", user_id, e),
    }
}
