//! Worked-time accumulation
//!
//! Totals are reported in whole seconds. Entries whose interval runs backwards
//! are never allowed to reduce a total: they are left out and reported as
//! [`CorruptEntry`] warnings.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::LedgerError;
use crate::models::{TimesheetEntry, TimeRange};

/// Unit of [`WorkedTime::seconds`], as reported to API clients
pub const DURATION_UNIT: &str = "seconds";

/// How entries without a clock-out contribute to a total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenEntryPolicy {
    /// Open entries add nothing
    Exclude,
    /// Open entries count up to the given instant
    CountUntil(DateTime<Utc>),
}

/// An entry left out of a total because its interval is negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorruptEntry {
    pub entry_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub reason: String,
}

/// Aggregate worked time over a set of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkedTime {
    /// Total in seconds, never negative
    pub seconds: i64,
    /// Entries that contributed to `seconds`
    pub entries_counted: usize,
    /// Open entries inside the window (counted or not, depending on policy)
    pub open_entries: usize,
    pub corrupt_entries: Vec<CorruptEntry>,
}

impl WorkedTime {
    pub fn as_duration(&self) -> Duration {
        Duration::seconds(self.seconds)
    }

    pub fn hours(&self) -> f64 {
        self.seconds as f64 / 3600.0
    }
}

/// Sum worked time over `entries` whose `clock_in` falls in `range`
pub fn worked_time<'a, I>(entries: I, range: &TimeRange, policy: OpenEntryPolicy) -> WorkedTime
where
    I: IntoIterator<Item = &'a TimesheetEntry>,
{
    let mut total = Duration::zero();
    let mut summary = WorkedTime::default();

    for entry in entries.into_iter().filter(|e| range.contains(e.clock_in)) {
        let end = match (entry.clock_out, policy) {
            (Some(out), _) => out,
            (None, OpenEntryPolicy::Exclude) => {
                summary.open_entries += 1;
                continue;
            }
            (None, OpenEntryPolicy::CountUntil(now)) => {
                summary.open_entries += 1;
                now
            }
        };

        if end < entry.clock_in {
            let reason = match entry.clock_out {
                Some(_) => "clock-out precedes clock-in",
                None => "clock-in is in the future",
            };
            warn!(
                entry_id = %entry.id,
                user_id = %entry.user_id,
                clock_in = %entry.clock_in,
                clock_out = ?entry.clock_out,
                reason,
                "Corrupt timesheet entry excluded from total"
            );
            summary.corrupt_entries.push(CorruptEntry {
                entry_id: entry.id,
                clock_in: entry.clock_in,
                clock_out: entry.clock_out,
                reason: reason.to_string(),
            });
            continue;
        }

        total += end - entry.clock_in;
        summary.entries_counted += 1;
    }

    summary.seconds = total.num_seconds();
    summary
}

/// Total hours from parallel clock-in/clock-out lists.
///
/// Pairs are matched by position. Inverted pairs are skipped and logged.
#[deprecated(note = "use TimesheetLedger::total_worked_duration, which reads entries from the store")]
pub fn total_hours_from_pairs(
    clock_ins: &[DateTime<Utc>],
    clock_outs: &[DateTime<Utc>],
) -> Result<f64, LedgerError> {
    if clock_ins.len() != clock_outs.len() {
        return Err(LedgerError::MismatchedPairs {
            clock_ins: clock_ins.len(),
            clock_outs: clock_outs.len(),
        });
    }

    let mut total = Duration::zero();
    for (index, (clock_in, clock_out)) in clock_ins.iter().zip(clock_outs).enumerate() {
        if clock_out < clock_in {
            warn!(index, clock_in = %clock_in, clock_out = %clock_out, "Inverted clock pair excluded from total");
            continue;
        }
        total += *clock_out - *clock_in;
    }

    Ok(total.num_milliseconds() as f64 / 3_600_000.0)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap()
    }

    fn entry(clock_in: DateTime<Utc>, clock_out: Option<DateTime<Utc>>) -> TimesheetEntry {
        TimesheetEntry {
            id: Uuid::new_v4(),
            seq: 0,
            user_id: Uuid::nil(),
            clock_in,
            clock_out,
            created_at: clock_in,
        }
    }

    #[test]
    fn test_two_closed_entries_sum_to_one_hour_forty_five() {
        let entries = vec![
            entry(at(10, 0), Some(at(11, 30))),
            entry(at(13, 0), Some(at(13, 15))),
        ];

        let worked = worked_time(&entries, &TimeRange::ALL, OpenEntryPolicy::Exclude);

        assert_eq!(worked.as_duration(), Duration::minutes(105));
        assert_eq!(worked.seconds, 6300);
        assert_eq!(worked.hours(), 1.75);
        assert_eq!(worked.entries_counted, 2);
    }

    #[test]
    fn test_open_entry_policy() {
        let entries = vec![entry(at(9, 0), Some(at(10, 0))), entry(at(14, 0), None)];

        let excluded = worked_time(&entries, &TimeRange::ALL, OpenEntryPolicy::Exclude);
        assert_eq!(excluded.seconds, 3600);
        assert_eq!(excluded.open_entries, 1);
        assert_eq!(excluded.entries_counted, 1);

        let counted = worked_time(&entries, &TimeRange::ALL, OpenEntryPolicy::CountUntil(at(14, 30)));
        assert_eq!(counted.seconds, 3600 + 1800);
        assert_eq!(counted.entries_counted, 2);
    }

    #[test]
    fn test_corrupt_entry_is_excluded_and_reported() {
        let bad = entry(at(12, 0), Some(at(11, 0)));
        let entries = vec![entry(at(9, 0), Some(at(9, 30))), bad.clone()];

        let worked = worked_time(&entries, &TimeRange::ALL, OpenEntryPolicy::Exclude);

        assert_eq!(worked.seconds, 1800);
        assert_eq!(worked.corrupt_entries.len(), 1);
        assert_eq!(worked.corrupt_entries[0].entry_id, bad.id);
    }

    #[test]
    fn test_open_entry_in_the_future_is_corrupt_when_counted() {
        let entries = vec![entry(at(16, 0), None)];
        let worked = worked_time(&entries, &TimeRange::ALL, OpenEntryPolicy::CountUntil(at(15, 0)));

        assert_eq!(worked.seconds, 0);
        assert_eq!(worked.corrupt_entries[0].reason, "clock-in is in the future");
    }

    #[test]
    fn test_window_filters_on_clock_in() {
        let entries = vec![
            entry(at(8, 0), Some(at(9, 0))),
            entry(at(10, 0), Some(at(12, 0))),
            entry(at(17, 30), Some(at(18, 0))),
        ];
        let range = TimeRange::new(Some(at(9, 30)), Some(at(17, 0)));

        let worked = worked_time(&entries, &range, OpenEntryPolicy::Exclude);
        assert_eq!(worked.seconds, 2 * 3600);
        assert_eq!(worked.entries_counted, 1);
    }

    #[test]
    #[allow(deprecated)]
    fn test_pair_total_in_hours() {
        let hours = total_hours_from_pairs(&[at(10, 0), at(13, 0)], &[at(11, 30), at(13, 15)]).unwrap();
        assert_eq!(hours, 1.75);
    }

    #[test]
    #[allow(deprecated)]
    fn test_pair_total_rejects_mismatched_lengths() {
        let result = total_hours_from_pairs(&[at(10, 0), at(13, 0)], &[at(11, 30)]);
        assert_eq!(
            result,
            Err(LedgerError::MismatchedPairs { clock_ins: 2, clock_outs: 1 })
        );
    }

    #[test]
    #[allow(deprecated)]
    fn test_pair_total_skips_inverted_pairs() {
        let hours = total_hours_from_pairs(&[at(10, 0), at(13, 0)], &[at(11, 0), at(12, 0)]).unwrap();
        assert_eq!(hours, 1.0);
    }
}
