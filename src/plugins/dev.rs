//! Developer panel plugin.
//!
//! `/dev` opens the panel; `dev:commands` and `dev:panel` switch between
//! the command list and the panel itself.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{get_text, get_text_with};
use crate::utils::{html_escape, no_preview};

/// Handle /dev. Only answers in private chats.
pub async fn dev_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let locale = state.users.lang_of(user.id.0 as i64).await;

    if !state.is_dev(user.id) {
        debug!("Non-developer {} opened /dev", user.id);
        bot.send_message(msg.chat.id, get_text(&locale, "dev.not_developer"))
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, panel_text(&user.first_name, &locale))
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .reply_markup(panel_keyboard(&state, &locale))
        .await?;

    Ok(())
}

/// Handle `dev:*` callbacks.
pub async fn dev_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let target = q.data.as_deref().and_then(|d| d.strip_prefix("dev:"));
    let message = q.message.as_ref().filter(|m| m.chat().is_private());

    let (Some(message), true) = (message, state.is_dev(q.from.id)) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let locale = state.users.lang_of(q.from.id.0 as i64).await;
    let (text, keyboard) = match target {
        Some("commands") => (
            get_text(&locale, "dev.commands"),
            InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
                get_text(&locale, "menu.back"),
                "dev:panel",
            )]]),
        ),
        Some("panel") => (
            panel_text(&q.from.first_name, &locale),
            panel_keyboard(&state, &locale),
        ),
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

fn panel_text(first_name: &str, locale: &str) -> String {
    get_text_with(locale, "dev.panel", &[("name", &html_escape(first_name))])
}

fn panel_keyboard(state: &AppState, locale: &str) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    if let Some(url) = &state.support_url {
        rows.push(vec![InlineKeyboardButton::url(
            get_text(locale, "menu.support"),
            url.clone(),
        )]);
    }
    rows.push(vec![InlineKeyboardButton::callback(
        get_text(locale, "dev.commands_button"),
        "dev:commands",
    )]);
    InlineKeyboardMarkup::new(rows)
}
