use crate::bot::keyboards::main_menu;
use crate::utils::markdown::escape_markdown;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

/// Kinds of user-facing replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
    Hint,
}

impl FeedbackType {
    pub fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "📋",
            FeedbackType::Hint => "🙂",
        }
    }
}

/// Formats plain text as an escaped MarkdownV2 reply with the type's emoji.
pub fn format_feedback(feedback_type: FeedbackType, message: &str) -> String {
    format!("{} {}", feedback_type.emoji(), escape_markdown(message))
}

/// Sends replies to one chat, always with the main menu keyboard attached.
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.send_markdown(&format_feedback(feedback_type, message)).await
    }

    /// Sends text that is already valid MarkdownV2.
    pub async fn send_markdown(&self, text: &str) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(main_menu())
            .await
    }

    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn hint(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Hint, message).await
    }

    /// Generic apology used when a message could not be processed.
    pub async fn apology(&self) -> ResponseResult<Message> {
        self.send(
            FeedbackType::Error,
            "Kechirasiz, xatolik yuz berdi. Birozdan so‘ng qayta urinib ko‘ring.",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "📋");
        assert_eq!(FeedbackType::Hint.emoji(), "🙂");
    }

    #[test]
    fn test_format_feedback_escapes() {
        assert_eq!(
            format_feedback(FeedbackType::Hint, "Iltimos, vaqtni ham yozing."),
            "🙂 Iltimos, vaqtni ham yozing\\."
        );
    }
}
