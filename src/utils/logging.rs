use crate::database::models::Reminder;
use crate::error::ReminderError;
use tracing::{debug, error, info, warn};

/// Logs a newly stored reminder.
pub fn log_reminder_created(reminder: &Reminder) {
    info!(
        reminder_id = reminder.id,
        owner = reminder.owner,
        fire_at = reminder.fire_at,
        "REMINDER_CREATED: '{}'",
        reminder.task
    );
}

pub fn log_reminder_cancelled(owner: i64, id: i64, removed: bool) {
    if removed {
        info!(reminder_id = id, owner, "REMINDER_CANCELLED");
    } else {
        debug!(reminder_id = id, owner, "REMINDER_CANCELLED: nothing to remove");
    }
}

pub fn log_delivery_ok(reminder: &Reminder) {
    info!(reminder_id = reminder.id, owner = reminder.owner, "DELIVERY_OK");
}

/// The reminder stays stored; the next pass retries it.
pub fn log_delivery_failed(reminder: &Reminder, err: &ReminderError) {
    warn!(
        reminder_id = reminder.id,
        owner = reminder.owner,
        "DELIVERY_FAILED: {} - kept for retry",
        err
    );
}

pub fn log_extraction_degraded(text: &str, err: &ReminderError) {
    warn!("EXTRACTION_DEGRADED: {} - falling back to rule for '{}'", err, text);
}

/// `event` is one of the `CONFIRMATION_*` names.
pub fn log_confirmation_event(event: &str, owner: i64, hour: u32, minute: u32) {
    info!(owner, "{}: {:02}:{:02}", event, hour, minute);
}

/// Logs a per-message failure that was turned into an apology.
pub fn log_handler_error(handler: &str, owner: i64, err: &ReminderError) {
    error!(owner, "HANDLER_ERROR: {} - {}", handler, err);
}

pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
