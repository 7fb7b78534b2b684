//! Retry policy for store calls.
//!
//! The delay schedule is a pure function of the attempt number, so it can
//! be unit-tested without sleeping; the retrying wrapper owns the sleeps.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::StoreError;

/// Exponential backoff schedule: `2^attempt * base`.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Base delay multiplied by the exponential factor.
    pub base: Duration,
    /// Additional attempts after the first (total attempts = retries + 1).
    pub retries: u32,
}

impl BackoffPolicy {
    /// Production schedule: three retries at 500ms, 1s, 2s.
    pub const fn standard() -> Self {
        Self {
            base: Duration::from_millis(500),
            retries: 3,
        }
    }

    /// Zero-delay schedule for tests.
    pub const fn immediate(retries: u32) -> Self {
        Self {
            base: Duration::ZERO,
            retries,
        }
    }

    /// Delay before the re-attempt that follows failed attempt `attempt`
    /// (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base * 2u32.saturating_pow(attempt)
    }
}

/// Run `op` to completion, retrying transient failures per `policy`.
///
/// Non-transient errors fail immediately; a transient error is returned
/// only once the retry budget is exhausted.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    label: &str,
    mut op: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(err) if err.is_transient() && attempt < policy.retries => {
                let delay = policy.delay(attempt);
                warn!(
                    "{label}: transient failure on attempt {}: {err}; retrying in {delay:?}",
                    attempt + 1
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn schedule_is_exponential() {
        let policy = BackoffPolicy::standard();
        assert_eq!(policy.delay(0), Duration::from_millis(500));
        assert_eq!(policy.delay(1), Duration::from_millis(1000));
        assert_eq!(policy.delay(2), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = Cell::new(0u32);
        let result = retry_with_backoff(&BackoffPolicy::immediate(3), "upsert", || {
            let n = calls.get() + 1;
            calls.set(n);
            async move {
                if n <= 2 {
                    Err(StoreError::Status {
                        status: 503,
                        body: "overloaded".into(),
                    })
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn fatal_status_fails_without_retry() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = retry_with_backoff(&BackoffPolicy::immediate(3), "get", || {
            calls.set(calls.get() + 1);
            async {
                Err(StoreError::Status {
                    status: 400,
                    body: "bad filter".into(),
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn budget_exhaustion_surfaces_the_error() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> =
            retry_with_backoff(&BackoffPolicy::immediate(3), "scroll", || {
                calls.set(calls.get() + 1);
                async {
                    Err(StoreError::Status {
                        status: 503,
                        body: "still down".into(),
                    })
                }
            })
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Status { status: 503, .. })
        ));
        assert_eq!(calls.get(), 4);
    }
}
