use crate::bot::handlers::HandlerResult;
use crate::database::models::Reminder;
use crate::services::reminder::ReminderService;
use crate::utils::datetime::format_clock;
use crate::utils::feedback::{CommandFeedback, FeedbackType};
use crate::utils::logging::log_handler_error;
use crate::utils::markdown::escape_markdown;
use crate::utils::validation::cancel_command;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use teloxide::prelude::*;

pub const EMPTY_LIST_TEXT: &str = "Sizda kutilayotgan xabarlar yo‘q";

/// MarkdownV2 list of pending reminders, or `None` when there are none.
/// Reminders on a later day than `now` are marked with their date.
pub fn render_pending(reminders: &[Reminder], now: DateTime<Utc>, tz: Tz) -> Option<String> {
    if reminders.is_empty() {
        return None;
    }

    let today = now.with_timezone(&tz).date_naive();
    let mut text = format!("{} *Kutilayotgan bildirishnomalar:*\n\n", FeedbackType::Info.emoji());

    for reminder in reminders {
        let local = reminder.fire_time().with_timezone(&tz);
        let when = if local.date_naive() == today {
            format_clock(reminder.fire_time(), tz)
        } else {
            format!("{} {}", local.format("%d.%m"), format_clock(reminder.fire_time(), tz))
        };

        text.push_str(&format!(
            "🕒 {} — {} → {}\n",
            escape_markdown(&when),
            escape_markdown(&reminder.task),
            escape_markdown(&cancel_command(reminder.id))
        ));
    }

    Some(text)
}

pub async fn handle_pending(bot: Bot, msg: Message, service: &ReminderService) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id);
    let owner = msg.chat.id.0;

    let reminders = match service.pending(owner).await {
        Ok(reminders) => reminders,
        Err(e) => {
            log_handler_error("pending", owner, &e);
            feedback.apology().await?;
            return Ok(());
        }
    };

    match render_pending(&reminders, service.now(), service.timezone()) {
        Some(text) => feedback.send_markdown(&text).await?,
        None => feedback.hint(EMPTY_LIST_TEXT).await?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Tashkent;

    fn local(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Tashkent
            .with_ymd_and_hms(2024, 4, d, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_render_empty() {
        assert!(render_pending(&[], local(1, 8, 0), Tashkent).is_none());
    }

    #[test]
    fn test_render_today_and_tomorrow() {
        let reminders = vec![
            Reminder { id: 3, owner: 1, task: "dars".into(), fire_at: local(1, 12, 0).timestamp() },
            Reminder { id: 5, owner: 1, task: "sport".into(), fire_at: local(2, 7, 30).timestamp() },
        ];
        let text = render_pending(&reminders, local(1, 8, 0), Tashkent).unwrap();

        assert!(text.starts_with("📋 *Kutilayotgan bildirishnomalar:*"));
        assert!(text.contains("🕒 12:00 — dars → /ochir\\_3\n"));
        assert!(text.contains("🕒 02\\.04 07:30 — sport → /ochir\\_5\n"));
    }
}
