use crate::bot::handlers::HandlerResult;
use crate::utils::feedback::CommandFeedback;
use teloxide::prelude::*;

pub const WELCOME_TEXT: &str = "👋 Salom\\!\n\n\
Men ⏰ *aqlli eslatma botman*\\.\n\
Menga vaqt bilan yozing\\.\n\n\
_Masalan:_\n\
`12:00 da darsim bor`\n\
`07:00 da menga uyg'onishni eslatib yubor`";

pub async fn handle_start(bot: Bot, msg: Message) -> HandlerResult {
    CommandFeedback::new(bot, msg.chat.id)
        .send_markdown(WELCOME_TEXT)
        .await?;
    Ok(())
}
