use eslatma_bot::bot::commands::Command;
use eslatma_bot::utils::validation::{cancel_command, parse_cancel_command};
use teloxide::utils::command::BotCommands;

#[test]
fn test_known_commands_parse() {
    assert_eq!(Command::parse("/start", "eslatma_bot").ok(), Some(Command::Start));
    assert_eq!(Command::parse("/help", "eslatma_bot").ok(), Some(Command::Help));
    assert_eq!(
        Command::parse("/kutilayotgan", "eslatma_bot").ok(),
        Some(Command::Kutilayotgan)
    );
}

#[test]
fn test_commands_addressed_to_bot() {
    assert_eq!(
        Command::parse("/start@eslatma_bot", "eslatma_bot").ok(),
        Some(Command::Start)
    );
}

#[test]
fn test_cancel_links_are_not_commands() {
    assert!(Command::parse("/ochir_12", "eslatma_bot").is_err());
    assert_eq!(parse_cancel_command("/ochir_12"), Some(12));
}

#[test]
fn test_plain_text_is_not_a_command() {
    assert!(Command::parse("12:00 da darsim bor", "eslatma_bot").is_err());
}

#[test]
fn test_cancel_link_round_trip() {
    let link = cancel_command(42);
    assert_eq!(link, "/ochir_42");
    assert_eq!(parse_cancel_command(&link), Some(42));
}

#[test]
fn test_descriptions_list_every_command() {
    let help = Command::descriptions().to_string();
    assert!(help.contains("/start"));
    assert!(help.contains("/help"));
    assert!(help.contains("/kutilayotgan"));
}
