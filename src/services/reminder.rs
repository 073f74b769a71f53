use crate::database::{connection::DatabaseManager, models::Reminder};
use crate::error::{ReminderError, Result};
use crate::services::confirmation::ConfirmationRegister;
use crate::services::extractor::{normalize, parse_time, ClockTime, TaskExtractor};
use crate::utils::datetime::{fire_time_today, fire_time_tomorrow, Clock};
use crate::utils::logging::{log_confirmation_event, log_reminder_cancelled, log_reminder_created};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceOutcome {
    /// Stored for later today.
    Scheduled(Reminder),
    /// The time already passed today; the owner must confirm tomorrow.
    /// `seq` identifies the prompt and travels in its buttons.
    NeedsConfirmation { time: ClockTime, seq: u64 },
}

/// The owner's answer to the "tomorrow?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Scheduled(Reminder),
    Declined,
}

/// Everything a chat handler needs: the store, the confirmation slots, the
/// extractor and the clock. Built once at startup and cloned into handlers.
#[derive(Clone)]
pub struct ReminderService {
    db: DatabaseManager,
    register: Arc<ConfirmationRegister>,
    extractor: TaskExtractor,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl ReminderService {
    pub fn new(
        db: DatabaseManager,
        register: Arc<ConfirmationRegister>,
        extractor: TaskExtractor,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            db,
            register,
            extractor,
            clock,
            tz,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    pub fn register(&self) -> &ConfirmationRegister {
        &self.register
    }

    /// Handles free text from `owner`. A time still ahead today is stored
    /// right away; a passed one only opens a confirmation slot.
    pub async fn handle_utterance(&self, owner: i64, text: &str) -> Result<UtteranceOutcome> {
        let text = normalize(text);
        let time = parse_time(&text)?;

        let now = self.clock.now();
        let fire_at =
            fire_time_today(now, time.hour, time.minute, self.tz).ok_or(ReminderError::NoTimeFound)?;

        if fire_at < now {
            let seq = self.register.open(owner, time, text, now);
            log_confirmation_event("CONFIRMATION_OPENED", owner, time.hour, time.minute);
            return Ok(UtteranceOutcome::NeedsConfirmation { time, seq });
        }

        let task = self.extractor.derive_task(&text).await;
        let reminder = Reminder::create(&self.db.pool, owner, task, fire_at).await?;
        log_reminder_created(&reminder);
        Ok(UtteranceOutcome::Scheduled(reminder))
    }

    /// Resolves the owner's answer to prompt `seq`. With no live slot for
    /// that prompt the reply is stale and nothing changes.
    pub async fn resolve_confirmation(
        &self,
        owner: i64,
        seq: u64,
        decision: Decision,
    ) -> Result<ConfirmationOutcome> {
        let now = self.clock.now();
        let pending = self
            .register
            .take(owner, seq, now)
            .ok_or(ReminderError::StaleConfirmation)?;

        match decision {
            Decision::No => {
                log_confirmation_event(
                    "CONFIRMATION_DECLINED",
                    owner,
                    pending.time.hour,
                    pending.time.minute,
                );
                Ok(ConfirmationOutcome::Declined)
            }
            Decision::Yes => {
                let ClockTime { hour, minute } = pending.time;
                // "Tomorrow" is relative to the day the question was asked.
                let fire_at = fire_time_tomorrow(pending.opened_at, hour, minute, self.tz)
                    .ok_or(ReminderError::NoTimeFound)?;
                let task = self.extractor.derive_task(&pending.text).await;
                let reminder = Reminder::create(&self.db.pool, owner, task, fire_at).await?;
                log_confirmation_event("CONFIRMATION_ACCEPTED", owner, hour, minute);
                log_reminder_created(&reminder);
                Ok(ConfirmationOutcome::Scheduled(reminder))
            }
        }
    }

    /// Owner's reminders, soonest first.
    pub async fn pending(&self, owner: i64) -> Result<Vec<Reminder>> {
        Ok(Reminder::list_pending(&self.db.pool, owner).await?)
    }

    /// Cancels one of the owner's reminders. `false` when it is already gone
    /// or belongs to someone else.
    pub async fn cancel(&self, owner: i64, id: i64) -> Result<bool> {
        let removed = Reminder::delete_owned(&self.db.pool, owner, id).await?;
        log_reminder_cancelled(owner, id, removed);
        Ok(removed)
    }
}
