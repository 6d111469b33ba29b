//! Group membership bookkeeping.
//!
//! Keeps the `chats` collection in sync with the groups the bot is in and
//! greets developers who join a group.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Me, ParseMode};
use tracing::{debug, info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::ChatRecord;
use crate::i18n::{DEFAULT_LANG, get_text, get_text_with};
use crate::utils::{MessageExt, html_escape, no_preview, user_mention};

/// Returns the handler for `new_chat_members` messages.
pub fn joined_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.new_chat_members().is_some()).endpoint(members_joined)
}

/// Returns the handler for `left_chat_member` messages.
pub fn left_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.left_chat_member().is_some()).endpoint(member_left)
}

/// Handle new members.
async fn members_joined(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    me: Me,
) -> anyhow::Result<()> {
    let Some(members) = msg.new_chat_members() else {
        return Ok(());
    };
    let chat = &msg.chat;
    let chat_name = chat.title().unwrap_or_default().to_string();
    let record = ChatRecord::new(chat.id.0, &chat_name, chat.username().map(str::to_string));
    let created = match state.chats.register(&record).await {
        Ok(created) => created,
        Err(e) => {
            warn!("Failed to register chat {}: {}", chat.id, e);
            false
        }
    };

    let bot_added = members.iter().any(|m| m.id == me.id);
    if created && bot_added {
        info!("Added to group {} ({})", chat_name, chat.id);
        announce_group(&bot, &state, &record).await;

        let locale = state.lang_of(msg.sender_id()).await;
        let mut request = bot
            .send_message(chat.id, get_text(&locale, "events.group_welcome"))
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview());
        if let Some(url) = &state.support_url {
            request = request.reply_markup(InlineKeyboardMarkup::new(vec![vec![
                InlineKeyboardButton::url(get_text(&locale, "menu.support"), url.clone()),
            ]]));
        }
        if let Err(e) = request.await {
            warn!("Failed to send welcome to {}: {}", chat.id, e);
        }
    } else if !created {
        debug!("Group {} ({}) already registered", chat_name, chat.id);
    }

    if let Some(dev) = members.iter().find(|m| !m.is_bot && state.is_dev(m.id)) {
        let locale = state.users.lang_of(dev.id.0 as i64).await;
        let text = get_text_with(
            &locale,
            "events.dev_joined",
            &[("mention", &user_mention(dev.id.0 as i64, &dev.first_name))],
        );
        if let Err(e) = bot.send_message(chat.id, text).parse_mode(ParseMode::Html).await {
            warn!("Failed to greet developer in {}: {}", chat.id, e);
        }
    }

    Ok(())
}

/// Handle a member leaving; only the bot's own removal matters.
async fn member_left(msg: Message, state: AppState, me: Me) -> anyhow::Result<()> {
    let Some(left) = msg.left_chat_member() else {
        return Ok(());
    };
    if left.id != me.id {
        return Ok(());
    }

    match state.chats.remove(msg.chat.id.0).await? {
        Some(chat) => info!("Removed from group {} ({})", chat.chat_name, chat.chat_id),
        None => debug!("Removed from unregistered chat {}", msg.chat.id),
    }

    Ok(())
}

/// Post the new group notice to the log chat.
async fn announce_group(bot: &ThrottledBot, state: &AppState, record: &ChatRecord) {
    let link = match &record.username {
        Some(name) => format!("@{}", name),
        None => get_text(DEFAULT_LANG, "log.private_group"),
    };
    let text = get_text_with(
        DEFAULT_LANG,
        "log.new_group",
        &[
            ("name", &html_escape(&record.chat_name)),
            ("id", &record.chat_id.to_string()),
            ("link", &link),
        ],
    );
    state.notify_log(bot, text).await;
}
