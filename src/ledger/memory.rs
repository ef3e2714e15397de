//! In-process timesheet store

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StoreError, TimesheetStore};
use crate::models::{chronological, EntryUpdate, NewTimesheetEntry, TimesheetEntry, TimeRange};

/// [`TimesheetStore`] kept in memory. Entries do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryTimesheetStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_seq: i64,
    entries: Vec<TimesheetEntry>,
}

impl MemoryState {
    fn next_seq(&mut self) -> i64 {
        self.next_seq += 1;
        self.next_seq
    }
}

impl InMemoryTimesheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a historical entry verbatim, skipping every invariant check.
    pub fn insert_unchecked(
        &self,
        user_id: Uuid,
        clock_in: DateTime<Utc>,
        clock_out: Option<DateTime<Utc>>,
    ) -> TimesheetEntry {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = TimesheetEntry {
            id: Uuid::new_v4(),
            seq: state.next_seq(),
            user_id,
            clock_in,
            clock_out,
            created_at: clock_in,
        };
        state.entries.push(entry.clone());
        entry
    }

    /// Every stored entry for `user_id`, oldest first
    pub fn snapshot(&self, user_id: Uuid) -> Vec<TimesheetEntry> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<_> = state
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(chronological);
        entries
    }
}

#[async_trait]
impl TimesheetStore for InMemoryTimesheetStore {
    async fn create_entry(&self, entry: NewTimesheetEntry) -> Result<TimesheetEntry, StoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state
            .entries
            .iter()
            .any(|e| e.user_id == entry.user_id && e.is_open())
        {
            return Err(StoreError::OpenEntryExists);
        }

        let created = TimesheetEntry {
            id: Uuid::new_v4(),
            seq: state.next_seq(),
            user_id: entry.user_id,
            clock_in: entry.clock_in,
            clock_out: None,
            created_at: Utc::now(),
        };
        state.entries.push(created.clone());

        Ok(created)
    }

    async fn find_open_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && e.is_open())
            .max_by(|a, b| chronological(a, b))
            .cloned())
    }

    async fn find_latest_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .max_by(|a, b| chronological(a, b))
            .cloned())
    }

    async fn update_entry(
        &self,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<Option<TimesheetEntry>, StoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(entry) = state.entries.iter_mut().find(|e| e.id == id && e.is_open()) else {
            return Ok(None);
        };
        entry.clock_out = Some(update.clock_out);

        Ok(Some(entry.clone()))
    }

    async fn query_entries(
        &self,
        user_id: Uuid,
        range: TimeRange,
    ) -> Result<Vec<TimesheetEntry>, StoreError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<_> = state
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && range.contains(e.clock_in))
            .cloned()
            .collect();
        entries.sort_by(chronological);

        Ok(entries)
    }
}
