use std::time::Duration;

/// Failure reported by an automation driver call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("timed out waiting for {what} after {after:?}")]
    Timeout { what: String, after: Duration },
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Http(u16),
    #[error("element not found: {0}")]
    ElementNotFound(String),
    #[error("script error: {0}")]
    Script(String),
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),
}

impl DriverError {
    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        DriverError::Timeout {
            what: what.into(),
            after,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }
}

/// Login failure from a [`super::SessionProvider`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("credentials rejected for {0}")]
    Rejected(String),
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("login page failed: {0}")]
    Driver(#[from] DriverError),
}
