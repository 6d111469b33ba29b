//! /stats command plugin.

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text_with;
use crate::utils::MessageExt;

/// Handle /stats: number of registered users and chats.
pub async fn stats_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let locale = state.lang_of(msg.sender_id()).await;
    let (users, chats) = tokio::try_join!(state.users.count(), state.chats.count())?;

    let text = get_text_with(
        &locale,
        "stats.text",
        &[("users", &users.to_string()), ("chats", &chats.to_string())],
    );

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
