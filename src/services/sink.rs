use crate::bot::keyboards::main_menu;
use crate::error::{ReminderError, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

/// Outbound message channel used by the delivery scheduler.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Sends MarkdownV2 `text` to the chat `owner`.
    async fn send(&self, owner: i64, text: &str) -> Result<()>;
}

pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl DeliverySink for TelegramSink {
    async fn send(&self, owner: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(owner), text)
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(main_menu())
            .await
            .map(|_| ())
            .map_err(|e| ReminderError::DeliveryFailed(e.to_string()))
    }
}
