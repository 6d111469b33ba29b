//! /help command plugin.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{get_text, get_text_with};
use crate::utils::{MessageExt, no_preview};

/// Handle /help. Private chats also get the menu buttons.
pub async fn help_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let locale = state.lang_of(msg.sender_id()).await;

    let request = bot
        .send_message(msg.chat.id, help_text(&state, &locale))
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview());

    if msg.chat.is_private() {
        request.reply_markup(help_keyboard(&locale)).await?;
    } else {
        request.await?;
    }

    Ok(())
}

pub fn help_text(state: &AppState, locale: &str) -> String {
    get_text_with(locale, "help.text", &[("bot", &state.bot_username)])
}

pub fn help_keyboard(locale: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::switch_inline_query_current_chat(
            get_text(locale, "menu.inline_search"),
            "",
        )],
        vec![InlineKeyboardButton::callback(get_text(locale, "menu.back"), "menu:start")],
    ])
}
