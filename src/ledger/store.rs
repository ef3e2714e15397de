//! Storage boundary of the ledger

use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::models::{EntryUpdate, NewTimesheetEntry, TimesheetEntry, TimeRange};

/// Durable home of timesheet entries.
///
/// Implementations own the entries; the ledger keeps nothing between calls.
/// A store must refuse to create a second open entry for a user
/// ([`StoreError::OpenEntryExists`]) and must only apply [`update_entry`]
/// to an entry that is still open, so that concurrent writers in other
/// processes cannot break the one-open-entry invariant.
///
/// [`update_entry`]: TimesheetStore::update_entry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimesheetStore: Send + Sync {
    /// Persist a new open entry, assigning its id and sequence number
    async fn create_entry(&self, entry: NewTimesheetEntry) -> Result<TimesheetEntry, StoreError>;

    /// The user's open entry, if any
    async fn find_open_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError>;

    /// The user's most recent entry by `(clock_in, seq)`, open or closed
    async fn find_latest_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError>;

    /// Close an open entry. Returns `None` when no open entry has that id.
    async fn update_entry(
        &self,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<Option<TimesheetEntry>, StoreError>;

    /// The user's entries whose `clock_in` falls in `range`, oldest first
    async fn query_entries(
        &self,
        user_id: Uuid,
        range: TimeRange,
    ) -> Result<Vec<TimesheetEntry>, StoreError>;
}
