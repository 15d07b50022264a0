//! Bounded polling: check a condition until it holds or a deadline passes.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Poll budget for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSpec {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollSpec {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Calls `probe` until `done` accepts its value or `poll.timeout` elapses.
///
/// Always probes at least once and returns the last observed value, so the
/// caller can inspect the state even when the condition never held. Probe
/// errors end the poll immediately.
pub async fn poll_until<T, E, F, Fut, P>(poll: PollSpec, mut probe: F, done: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
{
    let deadline = Instant::now() + poll.timeout;
    loop {
        let value = probe().await?;
        if done(&value) {
            return Ok(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(value);
        }
        let remaining = deadline - now;
        tokio::time::sleep(poll.interval.min(remaining)).await;
    }
}
