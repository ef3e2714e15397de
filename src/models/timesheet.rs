//! Timesheet entry model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One clock-in/clock-out interval.
///
/// An entry with no `clock_out` is *open*. A user has at most one open entry
/// at a time, and a recorded `clock_out` is never earlier than `clock_in`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TimesheetEntry {
    pub id: Uuid,
    /// Store-assigned creation sequence, breaks `clock_in` ties
    pub seq: i64,
    pub user_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TimesheetEntry {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Worked time of a closed entry; `None` while open
    pub fn duration(&self) -> Option<Duration> {
        self.clock_out.map(|out| out - self.clock_in)
    }
}

/// Fields for a freshly clocked-in entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimesheetEntry {
    pub user_id: Uuid,
    pub clock_in: DateTime<Utc>,
}

/// Mutable fields of an entry. Only the clock-out time ever changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryUpdate {
    pub clock_out: DateTime<Utc>,
}

/// Inclusive window on `clock_in`; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub const ALL: TimeRange = TimeRange { from: None, to: None };

    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }

    /// A window whose lower bound is after its upper bound selects nothing
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Ordering used everywhere entries are sorted: `clock_in`, then creation sequence
pub fn chronological(a: &TimesheetEntry, b: &TimesheetEntry) -> std::cmp::Ordering {
    a.clock_in.cmp(&b.clock_in).then(a.seq.cmp(&b.seq))
}
