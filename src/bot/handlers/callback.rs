use crate::bot::handlers::HandlerResult;
use crate::bot::keyboards::{CALLBACK_TOMORROW_NO, CALLBACK_TOMORROW_YES};
use crate::error::ReminderError;
use crate::services::reminder::{ConfirmationOutcome, Decision, ReminderService};
use crate::utils::datetime::format_clock;
use crate::utils::feedback::{format_feedback, FeedbackType};
use crate::utils::logging::log_handler_error;
use crate::utils::markdown::escape_markdown;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

/// Decision and prompt sequence number from a `tomorrow_yes:<seq>` payload.
pub fn parse_decision(data: &str) -> Option<(Decision, u64)> {
    let (prefix, seq) = data.split_once(':')?;
    let decision = match prefix {
        CALLBACK_TOMORROW_YES => Decision::Yes,
        CALLBACK_TOMORROW_NO => Decision::No,
        _ => return None,
    };
    let seq = seq.parse().ok()?;
    Some((decision, seq))
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, service: ReminderService) -> HandlerResult {
    let parsed = q.data.as_deref().and_then(parse_decision);
    let (Some((decision, seq)), Some(message)) = (parsed, q.message.as_ref()) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let owner = message.chat.id.0;
    tracing::info!("Callback {:?} from chat {}", decision, owner);

    let edited = match service.resolve_confirmation(owner, seq, decision).await {
        Ok(ConfirmationOutcome::Scheduled(reminder)) => Some(format!(
            "{} Eslatma ertangi kunga qo‘shildi\n🕒 {}\n📝 {}",
            FeedbackType::Success.emoji(),
            format_clock(reminder.fire_time(), service.timezone()),
            escape_markdown(&reminder.task)
        )),
        Ok(ConfirmationOutcome::Declined) => Some(format!("❎ {}", escape_markdown("Eslatma bekor qilindi"))),
        // Duplicate press or expired prompt: acknowledge and change nothing.
        Err(ReminderError::StaleConfirmation) => None,
        Err(e) => {
            log_handler_error("confirmation", owner, &e);
            Some(format_feedback(
                FeedbackType::Error,
                "Kechirasiz, eslatmani saqlab bo‘lmadi. Qayta yozib ko‘ring.",
            ))
        }
    };

    bot.answer_callback_query(q.id.clone()).await?;

    if let Some(text) = edited {
        bot.edit_message_text(message.chat.id, message.id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
    }
    Ok(())
}
