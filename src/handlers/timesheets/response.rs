//! Timesheet response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    ledger::{CorruptEntry, WorkedTime, DURATION_UNIT},
    models::TimesheetEntry,
    utils::format_duration,
};

/// Clock-in response
#[derive(Debug, Serialize)]
pub struct ClockInResponse {
    pub entry_id: Uuid,
    pub clock_in: DateTime<Utc>,
}

/// Clock-out response
#[derive(Debug, Serialize)]
pub struct ClockOutResponse {
    pub entry_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
}

impl From<TimesheetEntry> for ClockOutResponse {
    fn from(entry: TimesheetEntry) -> Self {
        Self {
            entry_id: entry.id,
            clock_in: entry.clock_in,
            clock_out: entry.clock_out,
            duration_seconds: entry.duration().map(|d| d.num_seconds()),
        }
    }
}

/// Worked-time total
#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub user_id: Uuid,
    pub duration: i64,
    pub unit: &'static str,
    pub hours: f64,
    pub formatted: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub entries_counted: usize,
    pub open_entries: usize,
    pub corrupt_entries: Vec<CorruptEntry>,
}

impl TotalResponse {
    pub fn new(
        user_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        worked: WorkedTime,
    ) -> Self {
        Self {
            user_id,
            duration: worked.seconds,
            unit: DURATION_UNIT,
            hours: worked.hours(),
            formatted: format_duration(worked.as_duration()),
            from,
            to,
            entries_counted: worked.entries_counted,
            open_entries: worked.open_entries,
            corrupt_entries: worked.corrupt_entries,
        }
    }
}

/// One timesheet entry as listed to clients
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub open: bool,
}

impl From<TimesheetEntry> for EntryResponse {
    fn from(entry: TimesheetEntry) -> Self {
        Self {
            id: entry.id,
            open: entry.is_open(),
            duration_seconds: entry.duration().map(|d| d.num_seconds()),
            clock_in: entry.clock_in,
            clock_out: entry.clock_out,
        }
    }
}

/// Entries list response
#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub user_id: Uuid,
    pub entries: Vec<EntryResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_response_reports_seconds_and_hours() {
        let worked = WorkedTime {
            seconds: 6300,
            entries_counted: 2,
            open_entries: 0,
            corrupt_entries: Vec::new(),
        };
        let response = TotalResponse::new(Uuid::new_v4(), None, None, worked);

        assert_eq!(response.duration, 6300);
        assert_eq!(response.unit, "seconds");
        assert_eq!(response.hours, 1.75);
        assert_eq!(response.formatted, "1h 45m");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["unit"], "seconds");
        assert_eq!(json["entries_counted"], 2);
    }
}
