//! /groups plugin: paged listing of registered groups.
//!
//! Developer-only. Each invocation opens a fresh listing session; the
//! previous/next buttons carry `groups:<session>:<page>` tokens.

use std::num::NonZeroUsize;

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::{ApiError, RequestError};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::ChatRecord;
use crate::i18n::{get_text, get_text_with};
use crate::listing::{NavToken, PagerSession, RenderedItem, paginate};
use crate::listing::nav::NOOP_TOKEN;
use crate::utils::{html_escape, no_preview};

/// Room for one page, before subtracting the command text.
const PAGE_LIMIT: usize = 3900;

/// Handle /groups.
pub async fn groups_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let locale = state.users.lang_of(user.id.0 as i64).await;

    let chats = state.chats.all().await?;
    let command_len = msg.text().map(|t| t.chars().count()).unwrap_or(0);
    let pages = paginate(render_items(&chats, &locale), page_budget(command_len));

    let (session_id, session) = state.listings.open(user.id.0, pages);
    debug!("{} groups in {} pages", chats.len(), session.page_count());

    bot.send_message(msg.chat.id, page_text(&session, &locale))
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .reply_markup(session.keyboard(session_id))
        .await?;

    Ok(())
}

/// Handle `groups:*` navigation callbacks.
pub async fn groups_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let data = q.data.as_deref().unwrap_or_default();
    if data == NOOP_TOKEN || !state.is_dev(q.from.id) {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    let locale = state.users.lang_of(q.from.id.0 as i64).await;
    let opened = NavToken::parse(data)
        .and_then(|token| state.listings.navigate(token).map(|s| (token.session, s)));

    let Some((session_id, session)) = opened else {
        bot.answer_callback_query(q.id.clone())
            .text(get_text(&locale, "groups.expired"))
            .await?;
        return Ok(());
    };

    debug!(
        "Listing {} at page {}/{}",
        session_id,
        session.current() + 1,
        session.page_count()
    );

    if let Some(message) = &q.message {
        let edited = bot
            .edit_message_text(message.chat().id, message.id(), page_text(&session, &locale))
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .reply_markup(session.keyboard(session_id))
            .await;

        match edited {
            // Clamped to the page already shown
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

/// One numbered line per group chat (negative IDs), in the given order.
fn render_items(chats: &[ChatRecord], locale: &str) -> Vec<RenderedItem> {
    chats
        .iter()
        .filter(|c| c.is_group())
        .enumerate()
        .map(|(i, chat)| {
            RenderedItem::new(get_text_with(
                locale,
                "groups.line",
                &[
                    ("index", &(i + 1).to_string()),
                    ("name", &html_escape(&chat.chat_name)),
                    ("id", &chat.chat_id.to_string()),
                ],
            ))
        })
        .collect()
}

fn page_budget(command_len: usize) -> NonZeroUsize {
    NonZeroUsize::new(PAGE_LIMIT.saturating_sub(command_len)).unwrap_or(NonZeroUsize::MIN)
}

fn page_text(session: &PagerSession, locale: &str) -> String {
    let page = session.page();
    if page.is_empty() {
        get_text(locale, "groups.empty")
    } else {
        page.text()
    }
}
