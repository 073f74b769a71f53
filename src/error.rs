use thiserror::Error;

/// Errors produced by the reminder core.
///
/// Only [`ReminderError::StorageUnavailable`] and [`ReminderError::Migration`]
/// are fatal, and only at startup. Everything else is handled at the message
/// handler boundary.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// The user text has no recognizable `HH:MM` token.
    #[error("no clock time found in message")]
    NoTimeFound,

    /// The language model call failed or answered with something unusable.
    #[error("task extraction degraded: {0}")]
    ExtractionDegraded(String),

    /// The SQLite store could not be opened or a query against it failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    /// Schema migrations could not be applied.
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The messaging channel rejected or failed a send.
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    /// A Yes/No reply arrived with no matching pending confirmation.
    #[error("no pending confirmation")]
    StaleConfirmation,
}

pub type Result<T> = std::result::Result<T, ReminderError>;
