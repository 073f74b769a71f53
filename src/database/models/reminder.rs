use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A pending reminder. `fire_at` is Unix epoch seconds and never changes
/// after insert; a different time means a new row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub owner: i64,
    pub task: String,
    pub fire_at: i64,
}

impl Reminder {
    pub fn fire_time(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.fire_at, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.fire_at <= now.timestamp()
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        owner: i64,
        task: String,
        fire_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let fire_at = fire_at.timestamp();

        let id = sqlx::query("INSERT INTO reminders (owner, task, fire_at) VALUES (?, ?, ?)")
            .bind(owner)
            .bind(&task)
            .bind(fire_at)
            .execute(pool)
            .await?
            .last_insert_rowid();

        Ok(Reminder {
            id,
            owner,
            task,
            fire_at,
        })
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, owner, task, fire_at FROM reminders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Every reminder across all owners whose fire time is at or before `now`.
    pub async fn list_due(
        pool: &sqlx::SqlitePool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, owner, task, fire_at FROM reminders WHERE fire_at <= ? ORDER BY fire_at, id",
        )
        .bind(now.timestamp())
        .fetch_all(pool)
        .await
    }

    pub async fn list_pending(
        pool: &sqlx::SqlitePool,
        owner: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, owner, task, fire_at FROM reminders WHERE owner = ? ORDER BY fire_at, id",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
    }

    pub async fn count_pending(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reminders")
            .fetch_one(pool)
            .await
    }

    /// Removes a reminder. Deleting an id that is already gone is not an error.
    pub async fn delete(pool: &sqlx::SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Removes a reminder only if it belongs to `owner`. Returns whether a row went away.
    pub async fn delete_owned(
        pool: &sqlx::SqlitePool,
        owner: i64,
        id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
