//! Capabilities the core needs from a browser automation backend.
//!
//! The core never touches a page directly: it asks an [`AutomationDriver`] to
//! navigate, wait, evaluate a named [`PageProbe`] and click. Authentication is
//! delegated to a [`SessionProvider`].

mod error;
pub mod fixture;
mod types;

pub use error::{AuthError, DriverError};
pub use types::{
    ApplyStatus, Cookie, Credentials, LoadState, NavigationPolicy, PageLoad, PageProbe,
    SessionData, WaitOptions,
};

use async_trait::async_trait;

/// One browser page driven sequentially by the orchestrator.
#[async_trait]
pub trait AutomationDriver: Send + Sync {
    /// Acquire the page used for the rest of the run.
    async fn open_page(&self) -> Result<(), DriverError>;

    async fn navigate(&self, url: &str, policy: &NavigationPolicy) -> Result<PageLoad, DriverError>;

    async fn wait_for_selector(&self, selector: &str, opts: WaitOptions) -> Result<(), DriverError>;

    async fn evaluate(&self, probe: PageProbe) -> Result<serde_json::Value, DriverError>;

    /// Invoke the element's click handler from inside the page.
    async fn dom_click(&self, selector: &str) -> Result<(), DriverError>;

    /// Physical (mouse) click.
    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    async fn capture_session(&self) -> Result<SessionData, DriverError>;

    async fn restore_session(&self, session: &SessionData) -> Result<(), DriverError>;
}

/// Performs the platform login and returns the resulting session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<SessionData, AuthError>;
}

/// Evaluate a probe that returns a boolean. Non-boolean results read as `false`.
pub async fn probe_flag<D: AutomationDriver + ?Sized>(
    driver: &D,
    probe: PageProbe,
) -> Result<bool, DriverError> {
    Ok(driver.evaluate(probe).await?.as_bool().unwrap_or(false))
}
