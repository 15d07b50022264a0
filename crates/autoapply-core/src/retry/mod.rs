//! Retry and backoff policy.
//!
//! Error classification (timeouts, throttling, connection failures) and the
//! backoff decision live here so the listing collector and any other caller
//! at the navigation boundary share one policy. The apply sequence itself is
//! never retried.

mod classify;
mod policy;
mod run;

pub use classify::classify;
pub use policy::{Backoff, ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
