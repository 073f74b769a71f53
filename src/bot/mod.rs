/// Bot commands and their replies
pub mod commands;
/// Update routing and per-update handlers
pub mod handlers;
/// Reply and inline keyboards
pub mod keyboards;
