#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Asia::Tashkent;
use eslatma_bot::database::{connection::DatabaseManager, models::Reminder};
use eslatma_bot::error::{ReminderError, Result};
use eslatma_bot::services::scheduler::{DeliveryReport, DeliveryScheduler};
use eslatma_bot::services::sink::DeliverySink;
use eslatma_bot::utils::datetime::{Clock, FixedClock};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tokio::sync::watch;

/// Records every message and can be switched into a failing mode.
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(i64, String)>>,
    failing: AtomicBool,
}

impl RecordingSink {
    fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliverySink for RecordingSink {
    async fn send(&self, owner: i64, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ReminderError::DeliveryFailed("chat unreachable".into()));
        }
        self.sent.lock().unwrap().push((owner, text.to_string()));
        Ok(())
    }
}

fn tashkent(h: u32, m: u32) -> DateTime<Utc> {
    Tashkent
        .with_ymd_and_hms(2024, 5, 1, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

async fn open_db(path: &Path) -> DatabaseManager {
    let db_url = format!("sqlite:{}", path.join("test.db").display());
    let db = DatabaseManager::new(&db_url).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

fn scheduler(
    db: &DatabaseManager,
    sink: &Arc<RecordingSink>,
    clock: &Arc<FixedClock>,
) -> DeliveryScheduler {
    let sink: Arc<dyn DeliverySink> = sink.clone();
    let clock: Arc<dyn Clock> = clock.clone();
    DeliveryScheduler::new(
        db.clone(),
        sink,
        clock,
        Tashkent,
        std::time::Duration::from_millis(50),
    )
}

#[tokio::test]
async fn test_due_reminders_are_delivered_once() {
    let temp_dir = tempdir().unwrap();
    let db = open_db(temp_dir.path()).await;
    let clock = Arc::new(FixedClock::new(tashkent(12, 0)));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = scheduler(&db, &sink, &clock);

    Reminder::create(&db.pool, 1, "darsim bor".into(), tashkent(12, 0)).await.unwrap();
    Reminder::create(&db.pool, 1, "kechki ovqat".into(), tashkent(19, 0)).await.unwrap();

    let report = scheduler.deliver_due().await.unwrap();
    assert_eq!(report, DeliveryReport { delivered: 1, failed: 0 });

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 1);
    assert!(sent[0].1.contains("darsim bor"));
    assert!(sent[0].1.contains("12:00"));

    let again = scheduler.deliver_due().await.unwrap();
    assert_eq!(again, DeliveryReport::default());
    assert_eq!(Reminder::count_pending(&db.pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_nothing_fires_early() {
    let temp_dir = tempdir().unwrap();
    let db = open_db(temp_dir.path()).await;
    let clock = Arc::new(FixedClock::new(tashkent(11, 59)));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = scheduler(&db, &sink, &clock);

    Reminder::create(&db.pool, 1, "dars".into(), tashkent(12, 0)).await.unwrap();

    assert_eq!(scheduler.deliver_due().await.unwrap().delivered, 0);
    assert!(sink.sent().is_empty());

    clock.advance(Duration::minutes(1));
    assert_eq!(scheduler.deliver_due().await.unwrap().delivered, 1);
}

#[tokio::test]
async fn test_failed_delivery_is_retried() {
    let temp_dir = tempdir().unwrap();
    let db = open_db(temp_dir.path()).await;
    let clock = Arc::new(FixedClock::new(tashkent(12, 0)));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = scheduler(&db, &sink, &clock);

    Reminder::create(&db.pool, 1, "dars".into(), tashkent(12, 0)).await.unwrap();

    sink.failing.store(true, Ordering::SeqCst);
    let report = scheduler.deliver_due().await.unwrap();
    assert_eq!(report, DeliveryReport { delivered: 0, failed: 1 });
    assert_eq!(Reminder::count_pending(&db.pool).await.unwrap(), 1);

    sink.failing.store(false, Ordering::SeqCst);
    clock.advance(Duration::seconds(20));
    let report = scheduler.deliver_due().await.unwrap();
    assert_eq!(report, DeliveryReport { delivered: 1, failed: 0 });
    assert_eq!(Reminder::count_pending(&db.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_cleanup_does_not_stop_the_pass() {
    let temp_dir = tempdir().unwrap();
    let db = open_db(temp_dir.path()).await;
    let clock = Arc::new(FixedClock::new(tashkent(12, 0)));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = scheduler(&db, &sink, &clock);

    let stuck = Reminder::create(&db.pool, 1, "dars".into(), tashkent(9, 0)).await.unwrap();
    Reminder::create(&db.pool, 2, "sport".into(), tashkent(10, 0)).await.unwrap();
    sqlx::query(&format!(
        "CREATE TRIGGER keep_row BEFORE DELETE ON reminders WHEN OLD.id = {} \
         BEGIN SELECT RAISE(ABORT, 'row is locked'); END",
        stuck.id
    ))
    .execute(&db.pool)
    .await
    .unwrap();

    let report = scheduler.deliver_due().await.unwrap();

    assert_eq!(report, DeliveryReport { delivered: 1, failed: 1 });
    let owners: Vec<i64> = sink.sent().iter().map(|(owner, _)| *owner).collect();
    assert_eq!(owners, vec![1, 2]);
    let left = Reminder::list_due(&db.pool, tashkent(12, 0)).await.unwrap();
    assert_eq!(left, vec![stuck]);
}

#[tokio::test]
async fn test_overdue_reminders_survive_restart() {
    let temp_dir = tempdir().unwrap();
    {
        let db = open_db(temp_dir.path()).await;
        Reminder::create(&db.pool, 1, "dars".into(), tashkent(9, 0)).await.unwrap();
        Reminder::create(&db.pool, 2, "sport".into(), tashkent(10, 0)).await.unwrap();
        db.pool.close().await;
    }

    // Process was down until well after both fire times.
    let db = open_db(temp_dir.path()).await;
    let clock = Arc::new(FixedClock::new(tashkent(15, 0)));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = scheduler(&db, &sink, &clock);

    let report = scheduler.deliver_due().await.unwrap();

    assert_eq!(report.delivered, 2);
    let owners: Vec<i64> = sink.sent().iter().map(|(owner, _)| *owner).collect();
    assert_eq!(owners, vec![1, 2]);
}

#[tokio::test]
async fn test_same_owner_delivered_in_fire_order() {
    let temp_dir = tempdir().unwrap();
    let db = open_db(temp_dir.path()).await;
    let clock = Arc::new(FixedClock::new(tashkent(18, 0)));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = scheduler(&db, &sink, &clock);

    Reminder::create(&db.pool, 1, "uchinchi".into(), tashkent(17, 0)).await.unwrap();
    Reminder::create(&db.pool, 1, "birinchi".into(), tashkent(8, 0)).await.unwrap();
    Reminder::create(&db.pool, 1, "ikkinchi".into(), tashkent(12, 30)).await.unwrap();

    scheduler.deliver_due().await.unwrap();

    let sent = sink.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].1.contains("birinchi"));
    assert!(sent[1].1.contains("ikkinchi"));
    assert!(sent[2].1.contains("uchinchi"));
}

#[tokio::test]
async fn test_run_delivers_and_stops_on_shutdown() {
    let temp_dir = tempdir().unwrap();
    let db = open_db(temp_dir.path()).await;
    let clock = Arc::new(FixedClock::new(tashkent(12, 0)));
    let sink = Arc::new(RecordingSink::default());

    Reminder::create(&db.pool, 3, "dars".into(), tashkent(11, 0)).await.unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler(&db, &sink, &clock).run(shutdown_rx));

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert_eq!(sink.sent().len(), 1);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Reminder::count_pending(&db.pool).await.unwrap(), 0);
}
