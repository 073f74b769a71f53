use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Mutex;

/// Source of "now" for the reminder core.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Resolves a civil date and clock time in `tz` to an instant.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times that
/// fall in a DST gap move forward to the first minute that exists.
pub fn resolve_local(date: NaiveDate, hour: u32, minute: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let mut naive = date.and_time(time);
    for _ in 0..=180 {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                return Some(dt.with_timezone(&Utc))
            }
            LocalResult::None => naive += Duration::minutes(1),
        }
    }
    None
}

/// `hour:minute` on the civil day of `now` in `tz`.
pub fn fire_time_today(now: DateTime<Utc>, hour: u32, minute: u32, tz: Tz) -> Option<DateTime<Utc>> {
    resolve_local(now.with_timezone(&tz).date_naive(), hour, minute, tz)
}

/// `hour:minute` on the civil day after `now` in `tz`.
pub fn fire_time_tomorrow(now: DateTime<Utc>, hour: u32, minute: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let tomorrow = now.with_timezone(&tz).date_naive().succ_opt()?;
    resolve_local(tomorrow, hour, minute, tz)
}

pub fn format_clock(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}
