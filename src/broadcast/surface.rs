//! Where the operator sees a run's progress and summary.

use std::future::Future;

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};

use crate::bot::dispatcher::ThrottledBot;
use crate::utils::no_preview;

/// A message the operator sees, first as a placeholder, then replaced.
pub trait StatusSurface {
    type Handle: Send + Sync;

    fn show_placeholder(
        &self,
        text: &str,
    ) -> impl Future<Output = anyhow::Result<Self::Handle>> + Send;

    fn replace(
        &self,
        handle: &Self::Handle,
        text: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Status surface backed by one Telegram chat.
#[derive(Clone)]
pub struct ChatSurface {
    bot: ThrottledBot,
    chat_id: ChatId,
}

impl ChatSurface {
    pub fn new(bot: ThrottledBot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

impl StatusSurface for ChatSurface {
    type Handle = MessageId;

    async fn show_placeholder(&self, text: &str) -> anyhow::Result<MessageId> {
        let sent = self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(sent.id)
    }

    async fn replace(&self, handle: &MessageId, text: &str) -> anyhow::Result<()> {
        self.bot
            .edit_message_text(self.chat_id, *handle, text)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .await?;
        Ok(())
    }
}

