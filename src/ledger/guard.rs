//! Bounded storage access
//!
//! Every call into the store is wrapped in a timeout. Reads are idempotent and
//! are retried on transient failures with exponential backoff plus jitter.
//! Writes get exactly one attempt: after a timeout the outcome is unknown, and
//! retrying could apply the mutation twice.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use super::StoreError;
use crate::config::LedgerConfig;

#[derive(Debug, Clone, Copy)]
pub struct StorageGuard {
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl StorageGuard {
    pub fn new(timeout: Duration, max_retries: u32, backoff: Duration) -> Self {
        Self {
            timeout,
            max_retries,
            backoff,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.storage_timeout(), config.max_retries, config.retry_backoff())
    }

    /// Run one storage call under the timeout
    pub async fn once<T, Fut>(&self, operation: &'static str, call: Fut) -> Result<T, StoreError>
    where
        Fut: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Storage call timed out");
                Err(StoreError::Unavailable(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.timeout.as_millis()
                )))
            }
        }
    }

    /// Run an idempotent read, retrying `Unavailable` failures
    pub async fn read<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 0;
        loop {
            match self.once(operation, call()).await {
                Err(StoreError::Unavailable(reason)) if attempt < self.max_retries => {
                    let delay = self.backoff_for(attempt);
                    attempt += 1;
                    warn!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        reason = %reason,
                        "Retrying storage read"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => {
                    if attempt > 0 {
                        debug!(operation, attempts = attempt + 1, ok = result.is_ok(), "Storage read finished after retries");
                    }
                    return result;
                }
            }
        }
    }

    /// Run a mutation exactly once
    pub async fn write<T, Fut>(&self, operation: &'static str, call: Fut) -> Result<T, StoreError>
    where
        Fut: Future<Output = Result<T, StoreError>>,
    {
        self.once(operation, call).await
    }

    /// `backoff * 2^attempt`, plus up to half of `backoff` of random jitter
    fn backoff_for(&self, attempt: u32) -> Duration {
        let base = self.backoff.saturating_mul(1u32 << attempt.min(16));
        let jitter_cap = (self.backoff.as_millis() / 2) as u64;
        let jitter = if jitter_cap == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_cap)
        };
        base + Duration::from_millis(jitter)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn guard(retries: u32) -> StorageGuard {
        StorageGuard::new(Duration::from_millis(50), retries, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_read_retries_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = guard(3)
            .read("probe", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(StoreError::Unavailable("connection reset".to_string()))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(assert_ok!(result), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_read_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = guard(2)
            .read("probe", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::Unavailable("down".to_string())) }
            })
            .await;

        assert!(matches!(assert_err!(result), StoreError::Unavailable(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_read_does_not_retry_backend_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = guard(5)
            .read("probe", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::Backend("syntax error".to_string())) }
            })
            .await;

        assert_eq!(result, Err(StoreError::Backend("syntax error".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_unavailable() {
        let result: Result<(), _> = guard(0)
            .write("slow_write", async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok(())
            })
            .await;

        match result {
            Err(StoreError::Unavailable(reason)) => assert!(reason.contains("slow_write")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        let guard = StorageGuard::new(Duration::from_secs(1), 3, Duration::from_millis(10));
        let first = guard.backoff_for(0);
        let third = guard.backoff_for(2);

        assert!(first >= Duration::from_millis(10) && first <= Duration::from_millis(15));
        assert!(third >= Duration::from_millis(40) && third <= Duration::from_millis(45));
    }
}
