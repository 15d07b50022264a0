//! Retry loop: run an async operation until success or policy says stop.

use std::future::Future;

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::driver::DriverError;

/// Runs `op` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// `op` receives the 1-based attempt number.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, DriverError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, DriverError>>,
{
    let mut attempt = 1u32;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(attempt, error = %e, "attempt failed, retrying in {:?}", d);
                    tokio::time::sleep(d).await;
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    fn timeout() -> DriverError {
        DriverError::Timeout {
            what: "page load".to_string(),
            after: Duration::from_secs(30),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = Cell::new(0u32);
        let result = run_with_retry(&RetryPolicy::default(), |attempt| {
            calls.set(calls.get() + 1);
            async move {
                if attempt < 3 {
                    Err(timeout())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.set(calls.get() + 1);
            async { Err(timeout()) }
        })
        .await;
        assert!(matches!(result, Err(DriverError::Timeout { .. })));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_returns_immediately() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.set(calls.get() + 1);
            async { Err(DriverError::Http(404)) }
        })
        .await;
        assert!(matches!(result, Err(DriverError::Http(404))));
        assert_eq!(calls.get(), 1);
    }
}
