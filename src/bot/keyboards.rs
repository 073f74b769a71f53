use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

/// Label of the persistent menu button that shows pending reminders.
pub const MENU_PENDING: &str = "📋 Kutilayotgan";

pub const CALLBACK_TOMORROW_YES: &str = "tomorrow_yes";
pub const CALLBACK_TOMORROW_NO: &str = "tomorrow_no";

pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(MENU_PENDING)]])
}

/// Callback payload of a prompt button, `<prefix>:<seq>`.
pub fn tomorrow_payload(prefix: &str, seq: u64) -> String {
    format!("{prefix}:{seq}")
}

/// Yes/No prompt for rescheduling a passed time to tomorrow. The buttons
/// carry the prompt's sequence number so a replaced prompt cannot answer
/// for its successor.
pub fn tomorrow_keyboard(seq: u64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Ha", tomorrow_payload(CALLBACK_TOMORROW_YES, seq)),
        InlineKeyboardButton::callback("Yo‘q", tomorrow_payload(CALLBACK_TOMORROW_NO, seq)),
    ]])
}
