//! Map driver failures onto retry policy error kinds.

use crate::driver::DriverError;
use crate::retry::policy::ErrorKind;

/// Classify a driver error for retry decisions.
pub fn classify(e: &DriverError) -> ErrorKind {
    match e {
        DriverError::Timeout { .. } => ErrorKind::Timeout,
        DriverError::Network(_) => ErrorKind::Connection,
        DriverError::Http(429) | DriverError::Http(503) => ErrorKind::Throttled,
        DriverError::Http(code) if (500..600).contains(code) => ErrorKind::Connection,
        DriverError::Http(_)
        | DriverError::ElementNotFound(_)
        | DriverError::Script(_)
        | DriverError::SessionUnavailable(_) => ErrorKind::Other,
    }
}
