//! What a broadcast sends and how one delivery is performed.

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::RequestError;

use super::Recipient;
use crate::bot::dispatcher::ThrottledBot;
use crate::utils::{no_preview, with_preview};

/// Flag that turns link previews on for text broadcasts.
const PREVIEW_FLAG: &str = "-d";

/// Content of one broadcast run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastContent {
    /// HTML text sent as a new message.
    Text { html: String, link_preview: bool },
    /// An existing message forwarded as-is.
    Forward { from_chat: ChatId, message_id: MessageId },
}

impl BroadcastContent {
    /// Build content from a command's arguments and optional replied message.
    ///
    /// A replied message wins over text. Returns `None` when there is
    /// nothing to send.
    pub fn from_command(args: &str, replied: Option<&Message>) -> Option<Self> {
        if let Some(source) = replied {
            return Some(Self::Forward {
                from_chat: source.chat.id,
                message_id: source.id,
            });
        }

        let args = args.trim();
        let (link_preview, html) = match args.strip_prefix(PREVIEW_FLAG) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                (true, rest.trim())
            }
            _ => (false, args),
        };

        if html.is_empty() {
            return None;
        }

        Some(Self::Text {
            html: html.to_string(),
            link_preview,
        })
    }
}

/// Deliver the content to one recipient, exactly one API call.
pub async fn deliver(
    bot: &ThrottledBot,
    recipient: Recipient,
    content: &BroadcastContent,
) -> Result<(), RequestError> {
    match content {
        BroadcastContent::Text { html, link_preview } => {
            let preview = if *link_preview { with_preview() } else { no_preview() };
            bot.send_message(recipient.chat_id(), html.as_str())
                .parse_mode(ParseMode::Html)
                .link_preview_options(preview)
                .await?;
        }
        BroadcastContent::Forward { from_chat, message_id } => {
            bot.forward_message(recipient.chat_id(), *from_chat, *message_id)
                .await?;
        }
    }
    Ok(())
}
