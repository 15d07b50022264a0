//! Cross-run application quota: persisted counter and remaining-slot logic.

mod lock;
mod store;

pub use store::{JsonCounterStore, MemoryCounterStore};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persisted count of confirmed applications. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCounter {
    #[serde(rename = "successfullyApplied")]
    pub successfully_applied: u32,
}

impl ApplicationCounter {
    pub fn new(successfully_applied: u32) -> Self {
        Self {
            successfully_applied,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("counter I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt counter file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage for the [`ApplicationCounter`].
pub trait ApplicationCounterStore: Send + Sync {
    /// Current counter; a store that was never written reads as zero.
    fn load(&self) -> Result<ApplicationCounter, CounterError>;

    /// Add `delta` to the stored count and return the new value.
    fn commit(&self, delta: u32) -> Result<ApplicationCounter, CounterError>;
}

/// Global application ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    global_max: u32,
}

impl RateLimiter {
    pub const DEFAULT_MAX: u32 = 50;

    pub fn new(global_max: u32) -> Self {
        Self { global_max }
    }

    pub fn global_max(&self) -> u32 {
        self.global_max
    }

    pub fn remaining(&self, counter: &ApplicationCounter) -> u32 {
        self.global_max
            .saturating_sub(counter.successfully_applied)
    }

    pub fn is_exhausted(&self, counter: &ApplicationCounter) -> bool {
        self.remaining(counter) == 0
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_saturates() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.remaining(&ApplicationCounter::new(0)), 50);
        assert_eq!(limiter.remaining(&ApplicationCounter::new(48)), 2);
        assert!(limiter.is_exhausted(&ApplicationCounter::new(50)));
        assert_eq!(limiter.remaining(&ApplicationCounter::new(70)), 0);
    }

    #[test]
    fn counter_json_shape() {
        let json = serde_json::to_string(&ApplicationCounter::new(7)).unwrap();
        assert_eq!(json, r#"{"successfullyApplied":7}"#);
        let back: ApplicationCounter = serde_json::from_str(&json).unwrap();
        assert_eq!(back.successfully_applied, 7);
    }
}
