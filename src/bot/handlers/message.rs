use crate::bot::commands::{cancel, list, start, Command};
use crate::bot::handlers::HandlerResult;
use crate::bot::keyboards::{tomorrow_keyboard, MENU_PENDING};
use crate::database::models::Reminder;
use crate::error::ReminderError;
use crate::services::reminder::{ReminderService, UtteranceOutcome};
use crate::utils::datetime::format_clock;
use crate::utils::feedback::{format_feedback, CommandFeedback, FeedbackType};
use crate::utils::logging::log_handler_error;
use crate::utils::markdown::escape_markdown;
use crate::utils::validation::parse_cancel_command;
use chrono_tz::Tz;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;

pub const NO_TIME_TEXT: &str = "Iltimos, vaqtni ham yozing.";
pub const PAST_TIME_TEXT: &str = "Bu vaqt allaqachon o‘tib ketgan.\nErtaga shu vaqtda eslataymi?";

/// Confirmation sent after a reminder is stored.
pub fn created_message(reminder: &Reminder, tz: Tz) -> String {
    format!(
        "{} Eslatma qo‘shildi\n🕒 {}\n📝 {}",
        FeedbackType::Success.emoji(),
        format_clock(reminder.fire_time(), tz),
        escape_markdown(&reminder.task)
    )
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    service: ReminderService,
) -> HandlerResult {
    match cmd {
        Command::Start => start::handle_start(bot, msg).await?,
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Kutilayotgan => list::handle_pending(bot, msg, &service).await?,
    }
    Ok(())
}

/// Every non-command message: the menu button, a cancel link, or an utterance.
pub async fn text_handler(bot: Bot, msg: Message, service: ReminderService) -> HandlerResult {
    let Some(text) = msg.text().map(str::to_owned) else {
        return Ok(());
    };

    if text.trim() == MENU_PENDING {
        return list::handle_pending(bot, msg, &service).await;
    }
    if let Some(id) = parse_cancel_command(&text) {
        return cancel::handle_cancel(bot, msg, id, &service).await;
    }

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let owner = msg.chat.id.0;

    if text.trim_start().starts_with('/') {
        feedback.hint("Noma’lum buyruq. /help ni ko‘ring.").await?;
        return Ok(());
    }

    match service.handle_utterance(owner, &text).await {
        Ok(UtteranceOutcome::Scheduled(reminder)) => {
            feedback
                .send_markdown(&created_message(&reminder, service.timezone()))
                .await?;
        }
        Ok(UtteranceOutcome::NeedsConfirmation { seq, .. }) => {
            bot.send_message(msg.chat.id, format_feedback(FeedbackType::Warning, PAST_TIME_TEXT))
                .parse_mode(ParseMode::MarkdownV2)
                .reply_markup(tomorrow_keyboard(seq))
                .await?;
        }
        Err(ReminderError::NoTimeFound) => {
            feedback.hint(NO_TIME_TEXT).await?;
        }
        Err(e) => {
            log_handler_error("utterance", owner, &e);
            feedback.apology().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Tashkent;

    #[test]
    fn test_created_message() {
        let fire_at = Tashkent.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap().timestamp();
        let reminder = Reminder { id: 1, owner: 1, task: "darsim bor".into(), fire_at };
        assert_eq!(
            created_message(&reminder, Tashkent),
            "✅ Eslatma qo‘shildi\n🕒 12:00\n📝 darsim bor"
        );
    }
}
