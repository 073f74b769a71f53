use crate::bot::handlers::HandlerResult;
use crate::services::reminder::ReminderService;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_handler_error;
use teloxide::prelude::*;

/// Cancels one reminder through its `/ochir_<id>` link.
pub async fn handle_cancel(
    bot: Bot,
    msg: Message,
    id: i64,
    service: &ReminderService,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id);
    let owner = msg.chat.id.0;

    match service.cancel(owner, id).await {
        Ok(true) => feedback.success("Eslatma o‘chirildi").await?,
        Ok(false) => feedback.hint("Bu eslatma topilmadi yoki allaqachon yuborilgan").await?,
        Err(e) => {
            log_handler_error("cancel", owner, &e);
            feedback.apology().await?
        }
    };
    Ok(())
}
