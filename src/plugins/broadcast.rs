//! /broadcast, /bc and /sendgp plugin.
//!
//! Developer-only. Text arguments are sent as HTML (`-d` turns link
//! previews on); replying to a message forwards that message instead.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::broadcast::{
    BroadcastContent, BroadcastError, ChatSurface, RecipientKind, deliver, run_broadcast,
};
use crate::i18n::get_text;
use crate::utils::MessageExt;

/// Handle /broadcast and /bc: send to every registered user.
pub async fn broadcast_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    broadcast_to(bot, msg, state, RecipientKind::User).await
}

/// Handle /sendgp: send to every registered group.
pub async fn sendgp_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    broadcast_to(bot, msg, state, RecipientKind::Chat).await
}

async fn broadcast_to(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    kind: RecipientKind,
) -> anyhow::Result<()> {
    let locale = state.lang_of(msg.sender_id()).await;

    let Some(content) = BroadcastContent::from_command(msg.command_args(), msg.reply_to_message())
    else {
        bot.send_message(msg.chat.id, get_text(&locale, "broadcast.usage"))
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    };

    info!(
        "Broadcast to {} requested by {:?}",
        kind.audience(),
        msg.sender_id()
    );

    let surface = ChatSurface::new(bot.clone(), msg.chat.id);
    let bot_ref = &bot;
    let content_ref = &content;

    let result = run_broadcast(&surface, &state.recipients, kind, &locale, move |recipient| {
        deliver(bot_ref, recipient, content_ref)
    })
    .await;

    match result {
        Ok(_) => Ok(()),
        // Already shown to the operator in place of the summary
        Err(BroadcastError::Enumeration(e)) => {
            warn!("Broadcast to {} aborted: {:#}", kind.audience(), e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
