pub mod callback;
pub mod message;

use crate::bot::commands::Command;
use crate::services::reminder::ReminderService;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub struct BotHandler {
    pub service: ReminderService,
}

impl BotHandler {
    pub fn new(service: ReminderService) -> Self {
        Self { service }
    }

    /// Commands first, then any other message as an utterance, then the
    /// Yes/No callbacks.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let commands = self.service.clone();
        let texts = self.service.clone();
        let callbacks = self.service.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let service = commands.clone();
                        async move { message::command_handler(bot, msg, cmd, service).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let service = texts.clone();
                async move { message::text_handler(bot, msg, service).await }
            }))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, q: CallbackQuery| {
                    let service = callbacks.clone();
                    async move { callback::callback_handler(bot, q, service).await }
                },
            ))
    }
}
