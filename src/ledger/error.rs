//! Ledger and storage error types

/// Failures reported by a [`TimesheetStore`](super::TimesheetStore)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Transient: the backend could not be reached or did not answer in time
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The store's one-open-entry-per-user constraint rejected a write
    #[error("User already has an open timesheet entry")]
    OpenEntryExists,

    /// The entry references a user the store does not know (e.g. deleted)
    #[error("Unknown user")]
    UnknownUser,

    /// Any other backend failure
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Errors returned by [`TimesheetLedger`](super::TimesheetLedger) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Already clocked in")]
    AlreadyClockedIn,

    #[error("No open timesheet session")]
    NoOpenSession,

    #[error("Mismatched clock-in and clock-out timestamps ({clock_ins} clock-ins, {clock_outs} clock-outs)")]
    MismatchedPairs { clock_ins: usize, clock_outs: usize },

    #[error("User does not exist")]
    UnknownUser,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => LedgerError::StorageUnavailable(reason),
            StoreError::OpenEntryExists => LedgerError::AlreadyClockedIn,
            StoreError::UnknownUser => LedgerError::UnknownUser,
            StoreError::Backend(reason) => LedgerError::Storage(reason),
        }
    }
}
