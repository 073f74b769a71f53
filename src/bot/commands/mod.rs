pub mod cancel;
pub mod list;
pub mod start;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Eslatma bot buyruqlari:")]
pub enum Command {
    #[command(description = "Botni ishga tushirish")]
    Start,
    #[command(description = "Yordam")]
    Help,
    #[command(description = "Kutilayotgan eslatmalar ro‘yxati")]
    Kutilayotgan,
}
