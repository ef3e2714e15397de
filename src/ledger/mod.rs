//! Timesheet ledger
//!
//! The ledger owns the clock-in/clock-out rules for every user:
//!
//! - a user has at most one open entry at a time
//! - clock-out closes the user's most recent entry, and only if it is open
//! - totals only ever count non-negative intervals
//!
//! It holds no timesheet state of its own. Every call reads what it needs from
//! the [`TimesheetStore`], under a per-user lock, with bounded storage time.

mod clock;
mod error;
mod guard;
mod locks;
mod memory;
mod store;
mod totals;

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

pub use clock::{Clock, SystemClock};
pub use error::{LedgerError, StoreError};
pub use guard::StorageGuard;
pub use locks::UserLocks;
pub use memory::InMemoryTimesheetStore;
pub use store::TimesheetStore;
#[allow(deprecated)]
pub use totals::total_hours_from_pairs;
pub use totals::{worked_time, CorruptEntry, OpenEntryPolicy, WorkedTime, DURATION_UNIT};

#[cfg(test)]
pub use store::MockTimesheetStore;

use crate::config::LedgerConfig;
use crate::models::{EntryUpdate, NewTimesheetEntry, TimesheetEntry, TimeRange};

/// Clock-in/clock-out bookkeeping over a [`TimesheetStore`]
#[derive(Clone)]
pub struct TimesheetLedger {
    store: Arc<dyn TimesheetStore>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
    guard: StorageGuard,
    count_open_entries: bool,
}

impl TimesheetLedger {
    pub fn new(store: Arc<dyn TimesheetStore>, config: &LedgerConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            locks: Arc::new(UserLocks::new()),
            guard: StorageGuard::from_config(config),
            count_open_entries: config.count_open_entries,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Open a new entry for `user_id` starting now.
    ///
    /// Fails with [`LedgerError::AlreadyClockedIn`] if the user already has an
    /// open entry.
    pub async fn clock_in(&self, user_id: Uuid) -> Result<TimesheetEntry, LedgerError> {
        let _lock = self.locks.lock(user_id).await;
        let store = &self.store;

        let open = self
            .guard
            .read("find_open_entry", || store.find_open_entry(user_id))
            .await?;
        if let Some(open) = open {
            debug!(user_id = %user_id, entry_id = %open.id, "Clock-in refused: entry already open");
            return Err(LedgerError::AlreadyClockedIn);
        }

        let new_entry = NewTimesheetEntry {
            user_id,
            clock_in: self.clock.now(),
        };
        let entry = self
            .guard
            .write("create_entry", store.create_entry(new_entry))
            .await?;

        info!(user_id = %user_id, entry_id = %entry.id, clock_in = %entry.clock_in, "Clocked in");
        Ok(entry)
    }

    /// Close the user's most recent entry.
    ///
    /// Fails with [`LedgerError::NoOpenSession`] if the user has no entries or
    /// the most recent one is already closed.
    pub async fn clock_out(&self, user_id: Uuid) -> Result<TimesheetEntry, LedgerError> {
        let _lock = self.locks.lock(user_id).await;
        let store = &self.store;

        let latest = self
            .guard
            .read("find_latest_entry", || store.find_latest_entry(user_id))
            .await?;
        let Some(latest) = latest.filter(TimesheetEntry::is_open) else {
            debug!(user_id = %user_id, "Clock-out refused: no open entry");
            return Err(LedgerError::NoOpenSession);
        };

        let now = self.clock.now();
        if now < latest.clock_in {
            warn!(
                user_id = %user_id,
                entry_id = %latest.id,
                clock_in = %latest.clock_in,
                now = %now,
                "Clock is behind the open entry; closing it at its clock-in time"
            );
        }
        let update = EntryUpdate {
            clock_out: now.max(latest.clock_in),
        };

        let closed = self
            .guard
            .write("update_entry", store.update_entry(latest.id, update))
            .await?
            .ok_or(LedgerError::NoOpenSession)?;

        info!(
            user_id = %user_id,
            entry_id = %closed.id,
            clock_in = %closed.clock_in,
            clock_out = ?closed.clock_out,
            "Clocked out"
        );
        Ok(closed)
    }

    /// Total time worked by `user_id` over entries clocked in within `range`.
    ///
    /// Open entries are excluded unless the ledger is configured to count them
    /// up to now. Corrupt entries are skipped and listed in the result.
    pub async fn total_worked_duration(
        &self,
        user_id: Uuid,
        range: TimeRange,
    ) -> Result<WorkedTime, LedgerError> {
        let entries = self.entries(user_id, range).await?;

        let policy = if self.count_open_entries {
            OpenEntryPolicy::CountUntil(self.clock.now())
        } else {
            OpenEntryPolicy::Exclude
        };
        let worked = worked_time(&entries, &range, policy);

        debug!(
            user_id = %user_id,
            seconds = worked.seconds,
            counted = worked.entries_counted,
            corrupt = worked.corrupt_entries.len(),
            "Computed worked time"
        );
        Ok(worked)
    }

    /// Entries clocked in within `range`, oldest first
    pub async fn entries(
        &self,
        user_id: Uuid,
        range: TimeRange,
    ) -> Result<Vec<TimesheetEntry>, LedgerError> {
        if range.is_inverted() {
            return Ok(Vec::new());
        }

        let store = &self.store;
        let entries = self
            .guard
            .read("query_entries", || store.query_entries(user_id, range))
            .await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use futures::future::join_all;
    use proptest::prelude::*;

    use super::clock::ManualClock;
    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    fn test_config() -> LedgerConfig {
        LedgerConfig {
            storage_timeout_ms: 100,
            max_retries: 2,
            retry_backoff_ms: 1,
            count_open_entries: false,
        }
    }

    fn ledger_with(
        store: Arc<dyn TimesheetStore>,
        config: LedgerConfig,
    ) -> (TimesheetLedger, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let ledger = TimesheetLedger::new(store, &config).with_clock(clock.clone());
        (ledger, clock)
    }

    fn memory_ledger() -> (TimesheetLedger, Arc<InMemoryTimesheetStore>, Arc<ManualClock>) {
        let store = Arc::new(InMemoryTimesheetStore::new());
        let (ledger, clock) = ledger_with(store.clone(), test_config());
        (ledger, store, clock)
    }

    #[tokio::test]
    async fn test_clock_in_twice_is_refused() {
        let (ledger, store, _) = memory_ledger();
        let user = Uuid::new_v4();

        let entry = ledger.clock_in(user).await.unwrap();
        assert!(entry.is_open());
        assert_eq!(entry.clock_in, start());

        assert_eq!(ledger.clock_in(user).await, Err(LedgerError::AlreadyClockedIn));
        assert_eq!(store.snapshot(user).len(), 1);
    }

    #[tokio::test]
    async fn test_clock_out_without_clock_in() {
        let (ledger, _, _) = memory_ledger();
        assert_eq!(ledger.clock_out(Uuid::new_v4()).await, Err(LedgerError::NoOpenSession));
    }

    #[tokio::test]
    async fn test_clock_out_twice_is_refused() {
        let (ledger, _, clock) = memory_ledger();
        let user = Uuid::new_v4();

        ledger.clock_in(user).await.unwrap();
        clock.advance(Duration::minutes(5));
        ledger.clock_out(user).await.unwrap();

        assert_eq!(ledger.clock_out(user).await, Err(LedgerError::NoOpenSession));
    }

    #[tokio::test]
    async fn test_interval_is_counted_exactly() {
        let (ledger, _, clock) = memory_ledger();
        let user = Uuid::new_v4();

        ledger.clock_in(user).await.unwrap();
        clock.advance(Duration::minutes(42) + Duration::seconds(7));
        let closed = ledger.clock_out(user).await.unwrap();

        assert_eq!(closed.clock_out, Some(start() + Duration::seconds(42 * 60 + 7)));
        let worked = ledger.total_worked_duration(user, TimeRange::ALL).await.unwrap();
        assert_eq!(worked.seconds, 42 * 60 + 7);
    }

    #[tokio::test]
    async fn test_morning_and_afternoon_sessions() {
        let (ledger, _, clock) = memory_ledger();
        let user = Uuid::new_v4();
        let day = |h, m| Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap();

        clock.set(day(10, 0));
        ledger.clock_in(user).await.unwrap();
        clock.set(day(11, 30));
        ledger.clock_out(user).await.unwrap();
        clock.set(day(13, 0));
        ledger.clock_in(user).await.unwrap();
        clock.set(day(13, 15));
        ledger.clock_out(user).await.unwrap();

        let worked = ledger.total_worked_duration(user, TimeRange::ALL).await.unwrap();
        assert_eq!(worked.as_duration(), Duration::hours(1) + Duration::minutes(45));
    }

    #[tokio::test]
    async fn test_open_entry_excluded_by_default() {
        let (ledger, _, clock) = memory_ledger();
        let user = Uuid::new_v4();

        ledger.clock_in(user).await.unwrap();
        clock.advance(Duration::hours(1));
        ledger.clock_out(user).await.unwrap();
        ledger.clock_in(user).await.unwrap();
        clock.advance(Duration::hours(3));

        let worked = ledger.total_worked_duration(user, TimeRange::ALL).await.unwrap();
        assert_eq!(worked.seconds, 3600);
        assert_eq!(worked.open_entries, 1);
    }

    #[tokio::test]
    async fn test_open_entry_counted_when_configured() {
        let store = Arc::new(InMemoryTimesheetStore::new());
        let config = LedgerConfig {
            count_open_entries: true,
            ..test_config()
        };
        let (ledger, clock) = ledger_with(store, config);
        let user = Uuid::new_v4();

        ledger.clock_in(user).await.unwrap();
        clock.advance(Duration::minutes(90));

        let worked = ledger.total_worked_duration(user, TimeRange::ALL).await.unwrap();
        assert_eq!(worked.seconds, 90 * 60);
    }

    #[tokio::test]
    async fn test_window_excludes_entries_outside_range() {
        let (ledger, store, _) = memory_ledger();
        let user = Uuid::new_v4();
        let day = |d, h| Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap();

        store.insert_unchecked(user, day(14, 9), Some(day(14, 17)));
        store.insert_unchecked(user, day(15, 9), Some(day(15, 12)));
        store.insert_unchecked(user, day(16, 9), Some(day(16, 10)));

        let range = TimeRange::new(Some(day(15, 0)), Some(day(15, 23)));
        let worked = ledger.total_worked_duration(user, range).await.unwrap();
        assert_eq!(worked.seconds, 3 * 3600);

        let inverted = TimeRange::new(Some(day(16, 0)), Some(day(14, 0)));
        let worked = ledger.total_worked_duration(user, inverted).await.unwrap();
        assert_eq!(worked, WorkedTime::default());
    }

    #[tokio::test]
    async fn test_corrupt_entry_does_not_reduce_total() {
        let (ledger, store, _) = memory_ledger();
        let user = Uuid::new_v4();

        store.insert_unchecked(user, start(), Some(start() + Duration::hours(2)));
        let bad = store.insert_unchecked(user, start() + Duration::hours(5), Some(start() + Duration::hours(4)));

        let worked = ledger.total_worked_duration(user, TimeRange::ALL).await.unwrap();
        assert_eq!(worked.seconds, 2 * 3600);
        assert_eq!(worked.corrupt_entries.len(), 1);
        assert_eq!(worked.corrupt_entries[0].entry_id, bad.id);
    }

    #[tokio::test]
    async fn test_clock_out_never_precedes_clock_in() {
        let (ledger, _, clock) = memory_ledger();
        let user = Uuid::new_v4();

        ledger.clock_in(user).await.unwrap();
        clock.set(start() - Duration::minutes(10));
        let closed = ledger.clock_out(user).await.unwrap();

        assert_eq!(closed.clock_out, Some(closed.clock_in));
    }

    #[tokio::test]
    async fn test_clock_out_only_looks_at_most_recent_entry() {
        let (ledger, store, _) = memory_ledger();
        let user = Uuid::new_v4();

        // A stale open entry followed by a newer closed one
        store.insert_unchecked(user, start() - Duration::days(2), None);
        store.insert_unchecked(user, start() - Duration::days(1), Some(start() - Duration::days(1) + Duration::hours(1)));

        assert_eq!(ledger.clock_out(user).await, Err(LedgerError::NoOpenSession));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clock_in_has_single_winner() {
        let (ledger, store, _) = memory_ledger();
        let user = Uuid::new_v4();

        let attempts = (0..16).map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.clock_in(user).await })
        });
        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let refused = results
            .iter()
            .filter(|r| **r == Err(LedgerError::AlreadyClockedIn))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(refused, 15);
        assert_eq!(store.snapshot(user).iter().filter(|e| e.is_open()).count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_users_are_independent() {
        let (ledger, _, _) = memory_ledger();
        let users: Vec<_> = (0..8).map(|_| Uuid::new_v4()).collect();

        let attempts = users.iter().map(|&user| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.clock_in(user).await })
        });
        for joined in join_all(attempts).await {
            assert!(joined.unwrap().is_ok());
        }
    }

    /// Store with no one-open-entry constraint of its own and a slow
    /// check-then-create path, so only the ledger's lock stands between two
    /// racing clock-ins.
    struct NoConstraintStore {
        inner: InMemoryTimesheetStore,
    }

    #[async_trait]
    impl TimesheetStore for NoConstraintStore {
        async fn create_entry(&self, entry: NewTimesheetEntry) -> Result<TimesheetEntry, StoreError> {
            tokio::time::sleep(StdDuration::from_millis(5)).await;
            Ok(self.inner.insert_unchecked(entry.user_id, entry.clock_in, None))
        }

        async fn find_open_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
            tokio::time::sleep(StdDuration::from_millis(5)).await;
            self.inner.find_open_entry(user_id).await
        }

        async fn find_latest_entry(&self, user_id: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
            self.inner.find_latest_entry(user_id).await
        }

        async fn update_entry(&self, id: Uuid, update: EntryUpdate) -> Result<Option<TimesheetEntry>, StoreError> {
            self.inner.update_entry(id, update).await
        }

        async fn query_entries(&self, user_id: Uuid, range: TimeRange) -> Result<Vec<TimesheetEntry>, StoreError> {
            self.inner.query_entries(user_id, range).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_user_lock_serializes_check_and_create() {
        let store = Arc::new(NoConstraintStore {
            inner: InMemoryTimesheetStore::new(),
        });
        let (ledger, _) = ledger_with(store.clone(), test_config());
        let user = Uuid::new_v4();

        let attempts = (0..8).map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.clock_in(user).await })
        });
        let successes = join_all(attempts)
            .await
            .into_iter()
            .filter(|joined| matches!(joined, Ok(Ok(_))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.inner.snapshot(user).len(), 1);
    }

    #[tokio::test]
    async fn test_store_conflict_maps_to_already_clocked_in() {
        let mut store = MockTimesheetStore::new();
        store.expect_find_open_entry().returning(|_| Ok(None));
        store
            .expect_create_entry()
            .times(1)
            .returning(|_| Err(StoreError::OpenEntryExists));
        let (ledger, _) = ledger_with(Arc::new(store), test_config());

        assert_eq!(ledger.clock_in(Uuid::new_v4()).await, Err(LedgerError::AlreadyClockedIn));
    }

    #[tokio::test]
    async fn test_clock_in_for_deleted_user_is_unknown_user() {
        let mut store = MockTimesheetStore::new();
        store.expect_find_open_entry().returning(|_| Ok(None));
        store
            .expect_create_entry()
            .times(1)
            .returning(|_| Err(StoreError::UnknownUser));
        let (ledger, _) = ledger_with(Arc::new(store), test_config());

        assert_eq!(ledger.clock_in(Uuid::new_v4()).await, Err(LedgerError::UnknownUser));
    }

    #[tokio::test]
    async fn test_transient_read_failures_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let mut store = MockTimesheetStore::new();
        store.expect_find_open_entry().times(3).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(StoreError::Unavailable("connection refused".to_string()))
            } else {
                Ok(None)
            }
        });
        store.expect_create_entry().times(1).returning(|new| {
            Ok(TimesheetEntry {
                id: Uuid::new_v4(),
                seq: 1,
                user_id: new.user_id,
                clock_in: new.clock_in,
                clock_out: None,
                created_at: new.clock_in,
            })
        });
        let (ledger, _) = ledger_with(Arc::new(store), test_config());

        assert!(ledger.clock_in(Uuid::new_v4()).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_write_is_not_retried() {
        let mut store = MockTimesheetStore::new();
        store.expect_find_open_entry().returning(|_| Ok(None));
        store
            .expect_create_entry()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("primary stepped down".to_string())));
        let (ledger, _) = ledger_with(Arc::new(store), test_config());

        assert!(matches!(
            ledger.clock_in(Uuid::new_v4()).await,
            Err(LedgerError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_reads_give_up_after_bounded_retries() {
        let mut store = MockTimesheetStore::new();
        store
            .expect_query_entries()
            .times(3)
            .returning(|_, _| Err(StoreError::Unavailable("timeout".to_string())));
        let (ledger, _) = ledger_with(Arc::new(store), test_config());

        let result = ledger.total_worked_duration(Uuid::new_v4(), TimeRange::ALL).await;
        assert!(matches!(result, Err(LedgerError::StorageUnavailable(_))));
    }

    /// Store that never answers within the ledger's timeout
    struct StalledStore;

    #[async_trait]
    impl TimesheetStore for StalledStore {
        async fn create_entry(&self, _: NewTimesheetEntry) -> Result<TimesheetEntry, StoreError> {
            tokio::time::sleep(StdDuration::from_secs(5)).await;
            Err(StoreError::Backend("unreachable".to_string()))
        }

        async fn find_open_entry(&self, _: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
            tokio::time::sleep(StdDuration::from_secs(5)).await;
            Ok(None)
        }

        async fn find_latest_entry(&self, _: Uuid) -> Result<Option<TimesheetEntry>, StoreError> {
            tokio::time::sleep(StdDuration::from_secs(5)).await;
            Ok(None)
        }

        async fn update_entry(&self, _: Uuid, _: EntryUpdate) -> Result<Option<TimesheetEntry>, StoreError> {
            tokio::time::sleep(StdDuration::from_secs(5)).await;
            Ok(None)
        }

        async fn query_entries(&self, _: Uuid, _: TimeRange) -> Result<Vec<TimesheetEntry>, StoreError> {
            tokio::time::sleep(StdDuration::from_secs(5)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_storage_timeout_surfaces_as_unavailable() {
        let config = LedgerConfig {
            storage_timeout_ms: 20,
            max_retries: 0,
            ..test_config()
        };
        let (ledger, _) = ledger_with(Arc::new(StalledStore), config);

        assert!(matches!(
            ledger.clock_out(Uuid::new_v4()).await,
            Err(LedgerError::StorageUnavailable(_))
        ));
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        ClockIn,
        ClockOut,
        Wait(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::ClockIn),
            Just(Op::ClockOut),
            (1i64..600).prop_map(Op::Wait),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: for any sequence of clock-ins and clock-outs, at most one
        /// entry is open, every outcome matches a two-state model, and the
        /// total equals the sum of the closed intervals.
        #[test]
        fn at_most_one_open_entry(ops in prop::collection::vec(op_strategy(), 1..40)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();

            runtime.block_on(async {
                let (ledger, store, clock) = memory_ledger();
                let user = Uuid::new_v4();
                let mut open_since: Option<DateTime<Utc>> = None;
                let mut expected = 0i64;

                for op in ops {
                    match op {
                        Op::ClockIn => {
                            let result = ledger.clock_in(user).await;
                            if open_since.is_some() {
                                prop_assert_eq!(result, Err(LedgerError::AlreadyClockedIn));
                            } else {
                                prop_assert!(result.is_ok());
                                open_since = Some(clock.now());
                            }
                        }
                        Op::ClockOut => {
                            let result = ledger.clock_out(user).await;
                            match open_since.take() {
                                Some(since) => {
                                    prop_assert!(result.is_ok());
                                    expected += (clock.now() - since).num_seconds();
                                }
                                None => prop_assert_eq!(result, Err(LedgerError::NoOpenSession)),
                            }
                        }
                        Op::Wait(seconds) => clock.advance(Duration::seconds(seconds)),
                    }

                    let open = store.snapshot(user).iter().filter(|e| e.is_open()).count();
                    prop_assert!(open <= 1);
                }

                let worked = ledger.total_worked_duration(user, TimeRange::ALL).await.unwrap();
                prop_assert_eq!(worked.seconds, expected);
                Ok(())
            })?;
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 48,
            ..ProptestConfig::default()
        })]

        /// Property: concurrent batches of clock-ins and clock-outs for one
        /// user, in random order, never leave two open entries, never record a
        /// clock-out before its clock-in, and succeed in an alternating pattern.
        #[test]
        fn concurrent_interleavings_keep_one_open_entry(
            batches in prop::collection::vec(
                (prop::collection::vec(any::<bool>(), 1..12), 0i64..120),
                1..6,
            )
        ) {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(4)
                .enable_time()
                .build()
                .unwrap();

            runtime.block_on(async {
                let (ledger, store, clock) = memory_ledger();
                let user = Uuid::new_v4();
                let mut open = false;

                for (ops, pause) in batches {
                    let tasks = ops.into_iter().map(|is_clock_in| {
                        let ledger = ledger.clone();
                        tokio::spawn(async move {
                            tokio::task::yield_now().await;
                            if is_clock_in {
                                (true, ledger.clock_in(user).await)
                            } else {
                                (false, ledger.clock_out(user).await)
                            }
                        })
                    });

                    let mut ins = 0i64;
                    let mut outs = 0i64;
                    for joined in join_all(tasks).await {
                        let (is_clock_in, result) = joined.unwrap();
                        match (is_clock_in, result) {
                            (true, Ok(_)) => ins += 1,
                            (false, Ok(_)) => outs += 1,
                            (true, Err(e)) => prop_assert_eq!(e, LedgerError::AlreadyClockedIn),
                            (false, Err(e)) => prop_assert_eq!(e, LedgerError::NoOpenSession),
                        }
                    }

                    // Successful calls alternate, so the open count moves by at most one
                    let open_after = i64::from(open) + ins - outs;
                    prop_assert!((0..=1).contains(&open_after));
                    open = open_after == 1;

                    let entries = store.snapshot(user);
                    prop_assert!(entries.iter().filter(|e| e.is_open()).count() <= 1);
                    prop_assert_eq!(entries.iter().any(|e| e.is_open()), open);
                    for entry in &entries {
                        if let Some(clock_out) = entry.clock_out {
                            prop_assert!(clock_out >= entry.clock_in);
                        }
                    }

                    clock.advance(Duration::seconds(pause));
                }
                Ok(())
            })?;
        }
    }
}
