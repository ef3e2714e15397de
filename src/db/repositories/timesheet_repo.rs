//! Timesheet repository
//!
//! Postgres enforces the one-open-entry rule itself through the partial unique
//! index `timesheet_entries_one_open_per_user`, and clock-out only updates rows
//! whose `clock_out` is still NULL. Those two conditional writes keep the
//! invariant even when several server processes share the database.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    ledger::{StoreError, TimesheetStore},
    models::{EntryUpdate, NewTimesheetEntry, TimesheetEntry, TimeRange},
};

/// Name of the partial unique index guarding open entries
const ONE_OPEN_ENTRY_INDEX: &str = "timesheet_entries_one_open_per_user";

/// Repository for timesheet database operations
pub struct TimesheetRepository;

impl TimesheetRepository {
    /// Insert a new open entry
    pub async fn create(
        pool: &PgPool,
        user_id: &Uuid,
        clock_in: chrono::DateTime<chrono::Utc>,
    ) -> Result<TimesheetEntry, sqlx::Error> {
        sqlx::query_as::<_, TimesheetEntry>(
            r#"
            INSERT INTO timesheet_entries (user_id, clock_in)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(clock_in)
        .fetch_one(pool)
        .await
    }

    /// Find the user's open entry
    pub async fn find_open(pool: &PgPool, user_id: &Uuid) -> Result<Option<TimesheetEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimesheetEntry>(
            r#"
            SELECT * FROM timesheet_entries
            WHERE user_id = $1 AND clock_out IS NULL
            ORDER BY clock_in DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Find the user's most recent entry
    pub async fn find_latest(pool: &PgPool, user_id: &Uuid) -> Result<Option<TimesheetEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimesheetEntry>(
            r#"
            SELECT * FROM timesheet_entries
            WHERE user_id = $1
            ORDER BY clock_in DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Close an entry if it is still open
    pub async fn close(
        pool: &PgPool,
        id: &Uuid,
        clock_out: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<TimesheetEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimesheetEntry>(
            r#"
            UPDATE timesheet_entries
            SET clock_out = $2
            WHERE id = $1 AND clock_out IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(clock_out)
        .fetch_optional(pool)
        .await
    }

    /// List the user's entries whose clock-in falls in the window
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &Uuid,
        range: &TimeRange,
    ) -> Result<Vec<TimesheetEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimesheetEntry>(
            r#"
            SELECT * FROM timesheet_entries
            WHERE user_id = $1
                AND ($2::timestamptz IS NULL OR clock_in >= $2)
                AND ($3::timestamptz IS NULL OR clock_in <= $3)
            ORDER BY clock_in ASC, seq ASC
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() && db_err.constraint() == Some(ONE_OPEN_ENTRY_INDEX) =>
            {
                StoreError::OpenEntryExists
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => StoreError::UnknownUser,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// [`TimesheetStore`] backed by Postgres
#[derive(Debug, Clone)]
pub struct PgTimesheetStore {
    pool: PgPool,
}

impl PgTimesheetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimesheetStore for PgTimesheetStore {
    async fn create_entry(&self, entry: NewTimesheetEntry) -> Result<TimesheetEntry, StoreError> {
        Ok(TimesheetRepository::create(&self.pool, &entry.user_id, entry.clock_in).await?)
    }

    async fn find_open_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
        Ok(TimesheetRepository::find_open(&self.pool, &user_id).await?)
    }

    async fn find_latest_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
        Ok(TimesheetRepository::find_latest(&self.pool, &user_id).await?)
    }

    async fn update_entry(
        &self,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<Option<TimesheetEntry>, StoreError> {
        Ok(TimesheetRepository::close(&self.pool, &id, update.clock_out).await?)
    }

    async fn query_entries(
        &self,
        user_id: Uuid,
        range: TimeRange,
    ) -> Result<Vec<TimesheetEntry>, StoreError> {
        Ok(TimesheetRepository::list_for_user(&self.pool, &user_id, &range).await?)
    }
}
