/// Yes/No slots for times that already passed
pub mod confirmation;
/// Clock time and task label extraction
pub mod extractor;
/// HTTP health endpoints
pub mod health;
/// Language model clients
pub mod llm;
/// Message handling on top of the store and the confirmation slots
pub mod reminder;
/// Background delivery of due reminders
pub mod scheduler;
/// Outbound message channel
pub mod sink;
