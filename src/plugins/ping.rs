//! Ping command plugin.
//!
//! Measures Telegram API latency and reports process uptime.

use std::time::Instant;

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};

use crate::bot::STARTED_AT;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{get_text, get_text_with};
use crate::utils::{MessageExt, format_uptime};

/// Handle the /ping command.
pub async fn ping_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let locale = state.lang_of(msg.sender_id()).await;

    // Latency is the round trip of the placeholder message
    let start = Instant::now();
    let sent = bot
        .send_message(msg.chat.id, get_text(&locale, "ping.pending"))
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    let ms = start.elapsed().as_millis();

    let text = get_text_with(
        &locale,
        "ping.result",
        &[
            ("latency", &ms.to_string()),
            ("uptime", &format_uptime(STARTED_AT.elapsed())),
        ],
    );

    bot.edit_message_text(sent.chat.id, sent.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
