//! Language selection plugin.
//!
//! `/lang` shows the language menu in private chats; `lang:<code>`
//! callbacks persist the choice.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::info;

use super::start::{start_keyboard, start_text};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{self, LANGUAGES, get_text, get_text_with};
use crate::utils::{MessageExt, no_preview};

/// Handle /lang. Groups get a button leading to the private chat.
pub async fn lang_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let locale = state.lang_of(msg.sender_id()).await;

    if !msg.chat.is_private() {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
            get_text(&locale, "lang.open_private"),
            state.start_link("lang")?,
        )]]);
        bot.send_message(msg.chat.id, get_text(&locale, "lang.private_only"))
            .reply_markup(keyboard)
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, get_text(&locale, "lang.choose"))
        .parse_mode(ParseMode::Html)
        .reply_markup(language_keyboard(&locale))
        .await?;

    Ok(())
}

/// Handle `lang:<code>` callbacks.
pub async fn lang_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let user_id = q.from.id.0 as i64;
    let requested = q.data.as_deref().and_then(|d| d.strip_prefix("lang:"));

    let Some(language) = requested.and_then(i18n::language) else {
        let locale = state.users.lang_of(user_id).await;
        bot.answer_callback_query(q.id.clone())
            .text(get_text(&locale, "lang.unknown"))
            .await?;
        return Ok(());
    };

    // Users who never pressed /start have no record yet
    if !state.users.set_lang(user_id, language.code).await? {
        state.users.register(&q.from).await?;
        state.users.set_lang(user_id, language.code).await?;
    }
    info!("User {} switched language to {}", user_id, language.code);

    let locale = language.code;
    if let Some(message) = &q.message {
        bot.edit_message_text(
            message.chat().id,
            message.id(),
            start_text(&state, &q.from.first_name, locale),
        )
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .reply_markup(start_keyboard(&state, locale)?)
        .await?;
    }

    bot.answer_callback_query(q.id.clone())
        .text(get_text_with(locale, "lang.changed", &[("language", language.label)]))
        .await?;

    Ok(())
}

/// One button per supported language, then a back button.
pub fn language_keyboard(locale: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = LANGUAGES
        .iter()
        .map(|l| vec![InlineKeyboardButton::callback(l.label, format!("lang:{}", l.code))])
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        get_text(locale, "menu.back"),
        "menu:start",
    )]);
    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;

    #[test]
    fn test_language_keyboard_callbacks() {
        let keyboard = language_keyboard("en");
        let data: Vec<String> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(d) => Some(d.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(data, vec!["lang:pt", "lang:en", "lang:es", "menu:start"]);
    }
}
