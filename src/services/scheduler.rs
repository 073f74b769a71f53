use crate::database::{connection::DatabaseManager, models::Reminder};
use crate::error::{ReminderError, Result};
use crate::services::sink::DeliverySink;
use crate::utils::datetime::{format_clock, Clock};
use crate::utils::logging::{log_delivery_failed, log_delivery_ok};
use crate::utils::markdown::escape_markdown;
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Outcome of one delivery pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Polls the store and delivers due reminders.
///
/// Each reminder is sent first and deleted second. A crash in between means
/// the reminder goes out again after restart; a failed send leaves the row
/// for the next pass. The first tick fires immediately, so anything that
/// came due while the process was down is delivered on startup.
pub struct DeliveryScheduler {
    db: DatabaseManager,
    sink: Arc<dyn DeliverySink>,
    clock: Arc<dyn Clock>,
    tz: Tz,
    interval: Duration,
}

impl DeliveryScheduler {
    pub fn new(
        db: DatabaseManager,
        sink: Arc<dyn DeliverySink>,
        clock: Arc<dyn Clock>,
        tz: Tz,
        interval: Duration,
    ) -> Self {
        Self {
            db,
            sink,
            clock,
            tz,
            interval,
        }
    }

    /// Runs until `shutdown` carries `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Delivery scheduler started - polling every {}s",
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.deliver_due().await {
                        error!("Delivery pass failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Delivery scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One pass over every due reminder, oldest first. A reminder that fails
    /// to send or to delete is counted as failed and the pass moves on.
    pub async fn deliver_due(&self) -> Result<DeliveryReport> {
        let now = self.clock.now();
        let due = Reminder::list_due(&self.db.pool, now).await?;
        let mut report = DeliveryReport::default();

        for reminder in due {
            let text = reminder_message(&reminder, self.tz);
            match self.sink.send(reminder.owner, &text).await {
                Ok(()) => match Reminder::delete(&self.db.pool, reminder.id).await {
                    Ok(()) => {
                        log_delivery_ok(&reminder);
                        report.delivered += 1;
                    }
                    // Sent but still stored: it goes out again next pass.
                    Err(e) => {
                        log_delivery_failed(&reminder, &ReminderError::from(e));
                        report.failed += 1;
                    }
                },
                Err(e) => {
                    log_delivery_failed(&reminder, &e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

/// MarkdownV2 body of a delivered reminder.
pub fn reminder_message(reminder: &Reminder, tz: Tz) -> String {
    format!(
        "🔔 *ESLATMA\\!*\n{}\n_soat {} bo‘ldi_",
        escape_markdown(&reminder.task),
        format_clock(reminder.fire_time(), tz)
    )
}
