//! Pending "remind tomorrow?" questions, one per owner.

use crate::services::extractor::ClockTime;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// An unanswered "that time has passed, remind tomorrow?" question.
///
/// Keeps the original text rather than an extracted task so the model is
/// only consulted once the user says yes. `seq` identifies the prompt the
/// buttons were attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    /// Unique per opened prompt.
    pub seq: u64,
    /// Requested clock time.
    pub time: ClockTime,
    /// Normalized message text.
    pub text: String,
    /// When the question was asked.
    pub opened_at: DateTime<Utc>,
}

/// One confirmation slot per owner, last write wins. Slots older than the
/// TTL count as absent.
pub struct ConfirmationRegister {
    slots: DashMap<i64, PendingConfirmation>,
    next_seq: AtomicU64,
    ttl: Duration,
}

impl ConfirmationRegister {
    /// Empty register whose slots live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            next_seq: AtomicU64::new(1),
            ttl,
        }
    }

    /// Opens (or replaces) the owner's slot and returns the new prompt's sequence number.
    pub fn open(&self, owner: i64, time: ClockTime, text: String, now: DateTime<Utc>) -> u64 {
        self.purge_expired(now);
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.slots.insert(
            owner,
            PendingConfirmation {
                seq,
                time,
                text,
                opened_at: now,
            },
        );
        seq
    }

    /// Empties the owner's slot and returns it if it is still live and
    /// belongs to prompt `seq`. A reply to a replaced prompt leaves the
    /// newer slot in place.
    pub fn take(&self, owner: i64, seq: u64, now: DateTime<Utc>) -> Option<PendingConfirmation> {
        let (_, pending) = self.slots.remove_if(&owner, |_, pending| pending.seq == seq)?;
        if self.is_expired(&pending, now) {
            None
        } else {
            Some(pending)
        }
    }

    /// Live slot for the owner, without consuming it.
    pub fn peek(&self, owner: i64, now: DateTime<Utc>) -> Option<PendingConfirmation> {
        self.slots
            .get(&owner)
            .map(|entry| entry.value().clone())
            .filter(|pending| !self.is_expired(pending, now))
    }

    /// Drops the owner's slot whatever its age. `true` when one existed.
    pub fn cancel(&self, owner: i64) -> bool {
        self.slots.remove(&owner).is_some()
    }

    /// Removes every expired slot and returns how many went away.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, pending| !self.is_expired(pending, now));
        before - self.slots.len()
    }

    /// Number of stored slots, expired ones included until the next purge.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn is_expired(&self, pending: &PendingConfirmation, now: DateTime<Utc>) -> bool {
        now - pending.opened_at >= self.ttl
    }
}
