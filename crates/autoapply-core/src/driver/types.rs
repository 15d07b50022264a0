use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AuthError;

/// Named page-side queries the core asks the driver to run. The driver owns the
/// platform-specific DOM reading; the core only decodes the returned JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageProbe {
    /// `{skillChips, description, applicants?, openings?}`.
    JobDetails,
    /// Boolean: the "already applied" marker is present.
    AppliedMarker,
    /// Boolean: a third-party "apply on company site" control is present.
    ExternalApply,
    /// [`ApplyStatus`] after clicking apply.
    ApplyStatus,
    /// Full `document.body` text.
    BodyText,
}

impl fmt::Display for PageProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageProbe::JobDetails => "job-details",
            PageProbe::AppliedMarker => "applied-marker",
            PageProbe::ExternalApply => "external-apply",
            PageProbe::ApplyStatus => "apply-status",
            PageProbe::BodyText => "body-text",
        };
        f.write_str(name)
    }
}

/// Page state read after an apply click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyStatus {
    /// The already-applied marker element is showing. Success text is matched
    /// by the core against the body text.
    #[serde(default)]
    pub applied_marker: bool,
    /// The apply control is still on the page.
    #[serde(default)]
    pub control_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub path: String,
}

/// Authenticated browser state, captured once after login and replayed before applying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub local_storage: BTreeMap<String, String>,
    #[serde(default)]
    pub session_storage: BTreeMap<String, String>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty() && self.local_storage.is_empty() && self.session_storage.is_empty()
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `AUTOAPPLY_USERNAME` / `AUTOAPPLY_PASSWORD`.
    pub fn from_env() -> Result<Self, AuthError> {
        let username = std::env::var("AUTOAPPLY_USERNAME")
            .map_err(|_| AuthError::MissingCredential("AUTOAPPLY_USERNAME"))?;
        let password = std::env::var("AUTOAPPLY_PASSWORD")
            .map_err(|_| AuthError::MissingCredential("AUTOAPPLY_PASSWORD"))?;
        Ok(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadState {
    /// DOMContentLoaded fired.
    DomContentLoaded,
    /// DOMContentLoaded fired and no network requests for a quiet period.
    #[default]
    NetworkIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPolicy {
    pub wait_until: LoadState,
    pub timeout: Duration,
}

impl NavigationPolicy {
    pub fn new(wait_until: LoadState, timeout: Duration) -> Self {
        Self {
            wait_until,
            timeout,
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::new(LoadState::default(), Duration::from_secs(60))
    }
}

/// Result of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    pub url: String,
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    /// Require the element to be visible, not only attached.
    pub visible: bool,
}

impl WaitOptions {
    pub fn attached(timeout: Duration) -> Self {
        Self {
            timeout,
            visible: false,
        }
    }

    pub fn visible(timeout: Duration) -> Self {
        Self {
            timeout,
            visible: true,
        }
    }
}
