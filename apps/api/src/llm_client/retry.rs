//! Retry policy for outbound model calls: attempt ceiling, exponential backoff, and a
//! predicate deciding which failures are worth another attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::LlmError;

/// Exponential backoff: the n-th retry (1-based) waits `min(base * 2^(n-1), max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    pub base: Duration,
    pub max: Duration,
}

impl BackoffSchedule {
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let factor = 1u32 << exponent;
        self.base.saturating_mul(factor).min(self.max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub backoff: BackoffSchedule,
    pub retryable: fn(&LlmError) -> bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: BackoffSchedule) -> Self {
        Self {
            max_attempts,
            backoff,
            retryable: is_transient,
        }
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt ceiling is reached. The closure receives the 0-based attempt index.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < attempts && (self.retryable)(&e) => {
                    attempt += 1;
                    let delay = self.backoff.delay_for(attempt);
                    warn!(
                        "Model call attempt {}/{} failed ({e}), retrying after {}ms",
                        attempt,
                        attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Transport failures, quota exhaustion (429) and server errors (5xx) are transient.
pub fn is_transient(err: &LlmError) -> bool {
    match err {
        LlmError::Http(_) => true,
        LlmError::Api { status, .. } => *status == 429 || (500..600).contains(status),
        LlmError::EmptyContent => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn schedule() -> BackoffSchedule {
        BackoffSchedule {
            base: Duration::from_secs(2),
            max: Duration::from_secs(10),
        }
    }

    fn api_error(status: u16) -> LlmError {
        LlmError::Api {
            status,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let s = schedule();
        assert_eq!(s.delay_for(1), Duration::from_secs(2));
        assert_eq!(s.delay_for(2), Duration::from_secs(4));
        assert_eq!(s.delay_for(3), Duration::from_secs(8));
        assert_eq!(s.delay_for(4), Duration::from_secs(10));
        assert_eq!(s.delay_for(60), Duration::from_secs(10));
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&api_error(429)));
        assert!(is_transient(&api_error(503)));
        assert!(!is_transient(&api_error(400)));
        assert!(!is_transient(&LlmError::EmptyContent));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, schedule());
        let start = tokio::time::Instant::now();

        let result = policy
            .run(|_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(api_error(429))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 2s + 4s of backoff under paused time.
        assert!(start.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, schedule());

        let result: Result<(), LlmError> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(api_error(401)) }
            })
            .await;

        assert!(matches!(result, Err(LlmError::Api { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_at_attempt_ceiling_with_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, schedule());

        let result: Result<(), LlmError> = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(api_error(500 + attempt as u16)) }
            })
            .await;

        assert!(matches!(result, Err(LlmError::Api { status: 502, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_predicate_disables_retries() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            retryable: |_| false,
            ..RetryPolicy::new(4, schedule())
        };

        let result: Result<(), LlmError> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(api_error(429)) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(0, schedule());
        let result = policy.run(|_| async { Ok::<_, LlmError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
