//! In-memory driver that serves recorded page fixtures keyed by job link.
//!
//! Used by `autoapply simulate` to dry-run the orchestrator offline, and by
//! tests to script page behavior and inspect the calls the core made.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{
    AuthError, AutomationDriver, Credentials, DriverError, NavigationPolicy, PageLoad, PageProbe,
    SessionData, SessionProvider, WaitOptions,
};
use crate::config::PlatformConfig;

/// How the page reacts to a successful apply click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    /// The body shows the confirmation phrase (which carries the success
    /// text); the apply control stays on the page.
    #[default]
    Confirmed,
    /// Already-applied marker shown, no confirmation phrase.
    Marked,
    /// Nothing changes; the apply control stays visible.
    NoChange,
    /// The control disappears without any marker.
    Vanished,
}

/// Scripted behavior of one job page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub reachable: bool,
    /// Only the first navigation succeeds (the re-navigation after session restore fails).
    pub fail_renavigation: bool,
    pub content_ready: bool,
    pub already_applied: bool,
    /// The already-applied probe throws, as on a detached frame.
    pub marker_probe_fails: bool,
    /// Raw `{skillChips, description, applicants, openings}`; `None` makes extraction fail.
    pub details: Option<Value>,
    pub external_apply: bool,
    pub apply_control: bool,
    pub dom_click_fails: bool,
    pub click_fails: bool,
    pub click_outcome: ClickOutcome,
    /// The apply-status probe returns a value that is not a status object.
    pub garbled_apply_status: bool,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            reachable: true,
            fail_renavigation: false,
            content_ready: true,
            already_applied: false,
            marker_probe_fails: false,
            details: None,
            external_apply: false,
            apply_control: true,
            dom_click_fails: false,
            click_fails: false,
            click_outcome: ClickOutcome::Confirmed,
            garbled_apply_status: false,
        }
    }
}

impl PageFixture {
    pub fn with_details(details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::default()
        }
    }
}

/// Driver call, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    OpenPage,
    Navigate(String),
    WaitForSelector(String),
    Evaluate(PageProbe),
    DomClick(String),
    Click(String),
    CaptureSession,
    RestoreSession,
}

#[derive(Debug, Default)]
struct FixtureState {
    current: Option<String>,
    navigations: HashMap<String, u32>,
    clicked: HashMap<String, bool>,
    session: Option<SessionData>,
    calls: Vec<DriverCall>,
}

pub struct FixtureDriver {
    pages: HashMap<String, PageFixture>,
    content_selector: String,
    apply_selector: String,
    confirmation_phrase: String,
    fail_open_page: bool,
    state: Mutex<FixtureState>,
}

impl FixtureDriver {
    pub fn new(pages: HashMap<String, PageFixture>) -> Self {
        Self::with_platform(pages, &PlatformConfig::default())
    }

    /// Use the selectors and confirmation phrase the orchestrator is configured with.
    pub fn with_platform(pages: HashMap<String, PageFixture>, platform: &PlatformConfig) -> Self {
        Self {
            pages,
            content_selector: platform.content_selector.clone(),
            apply_selector: platform.apply_selector.clone(),
            confirmation_phrase: platform.confirmation_phrase.clone(),
            fail_open_page: false,
            state: Mutex::new(FixtureState::default()),
        }
    }

    /// Load a `{ "<link>": PageFixture, ... }` JSON document.
    pub fn load_pages(path: &Path) -> anyhow::Result<HashMap<String, PageFixture>> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read page fixtures: {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("parse page fixtures: {}", path.display()))
    }

    /// Make `open_page` fail, as when the browser cannot be started.
    pub fn failing_open_page(mut self) -> Self {
        self.fail_open_page = true;
        self
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.lock().calls.clone()
    }

    pub fn restored_session(&self) -> Option<SessionData> {
        self.lock().session.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: DriverCall) {
        self.lock().calls.push(call);
    }

    fn current_page(&self) -> Result<(String, &PageFixture), DriverError> {
        let link = self
            .lock()
            .current
            .clone()
            .ok_or_else(|| DriverError::SessionUnavailable("no page loaded".to_string()))?;
        let page = self
            .pages
            .get(&link)
            .ok_or_else(|| DriverError::Network(format!("no fixture for {}", link)))?;
        Ok((link, page))
    }

    fn was_clicked(&self, link: &str) -> bool {
        self.lock().clicked.get(link).copied().unwrap_or(false)
    }

    fn apply_status(&self, link: &str, page: &PageFixture) -> Value {
        if page.garbled_apply_status {
            return Value::String("apply status unavailable".to_string());
        }
        if !self.was_clicked(link) {
            return json!({
                "appliedMarker": page.already_applied,
                "controlVisible": page.apply_control,
            });
        }
        let (marker, visible) = match page.click_outcome {
            ClickOutcome::Confirmed => (false, true),
            ClickOutcome::Marked => (true, false),
            ClickOutcome::NoChange => (false, true),
            ClickOutcome::Vanished => (false, false),
        };
        json!({ "appliedMarker": marker, "controlVisible": visible })
    }

    fn body_text(&self, link: &str, page: &PageFixture) -> String {
        if self.was_clicked(link) && page.click_outcome == ClickOutcome::Confirmed {
            format!("{} this job.", self.confirmation_phrase)
        } else {
            String::new()
        }
    }

    fn click_current(&self, selector: &str, fails: impl Fn(&PageFixture) -> bool) -> Result<(), DriverError> {
        let (link, page) = self.current_page()?;
        if selector != self.apply_selector || !page.apply_control {
            return Err(DriverError::ElementNotFound(selector.to_string()));
        }
        if fails(page) {
            return Err(DriverError::Script(format!("click on {} was intercepted", selector)));
        }
        self.lock().clicked.insert(link, true);
        Ok(())
    }
}

#[async_trait]
impl AutomationDriver for FixtureDriver {
    async fn open_page(&self) -> Result<(), DriverError> {
        self.record(DriverCall::OpenPage);
        if self.fail_open_page {
            return Err(DriverError::SessionUnavailable("browser did not start".to_string()));
        }
        Ok(())
    }

    async fn navigate(&self, url: &str, policy: &NavigationPolicy) -> Result<PageLoad, DriverError> {
        self.record(DriverCall::Navigate(url.to_string()));
        let page = self
            .pages
            .get(url)
            .ok_or_else(|| DriverError::Network(format!("no fixture for {}", url)))?;
        let mut state = self.lock();
        let count = state.navigations.entry(url.to_string()).or_insert(0);
        *count += 1;
        if !page.reachable || (page.fail_renavigation && *count > 1) {
            state.current = None;
            return Err(DriverError::timeout(format!("navigation to {}", url), policy.timeout));
        }
        state.current = Some(url.to_string());
        Ok(PageLoad {
            url: url.to_string(),
            status: Some(200),
        })
    }

    async fn wait_for_selector(&self, selector: &str, opts: WaitOptions) -> Result<(), DriverError> {
        self.record(DriverCall::WaitForSelector(selector.to_string()));
        let (_, page) = self.current_page()?;
        let present = if selector == self.content_selector {
            page.content_ready
        } else if selector == self.apply_selector {
            page.apply_control
        } else {
            false
        };
        if present {
            Ok(())
        } else {
            Err(DriverError::timeout(selector, opts.timeout))
        }
    }

    async fn evaluate(&self, probe: PageProbe) -> Result<Value, DriverError> {
        self.record(DriverCall::Evaluate(probe));
        let (link, page) = self.current_page()?;
        match probe {
            PageProbe::JobDetails => page
                .details
                .clone()
                .ok_or_else(|| DriverError::Script("job details container missing".to_string())),
            PageProbe::AppliedMarker if page.marker_probe_fails => {
                Err(DriverError::Script("execution context was destroyed".to_string()))
            }
            PageProbe::AppliedMarker => Ok(Value::Bool(page.already_applied)),
            PageProbe::ExternalApply => Ok(Value::Bool(page.external_apply)),
            PageProbe::ApplyStatus => Ok(self.apply_status(&link, page)),
            PageProbe::BodyText => Ok(Value::String(self.body_text(&link, page))),
        }
    }

    async fn dom_click(&self, selector: &str) -> Result<(), DriverError> {
        self.record(DriverCall::DomClick(selector.to_string()));
        self.click_current(selector, |p| p.dom_click_fails)
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.record(DriverCall::Click(selector.to_string()));
        self.click_current(selector, |p| p.click_fails)
    }

    async fn capture_session(&self) -> Result<SessionData, DriverError> {
        self.record(DriverCall::CaptureSession);
        Ok(self.lock().session.clone().unwrap_or_default())
    }

    async fn restore_session(&self, session: &SessionData) -> Result<(), DriverError> {
        self.record(DriverCall::RestoreSession);
        self.lock().session = Some(session.clone());
        Ok(())
    }
}

/// Session provider that hands out a fixed session, optionally for one username only.
pub struct StaticSessionProvider {
    session: SessionData,
    accepted_user: Option<String>,
}

impl StaticSessionProvider {
    pub fn new(session: SessionData) -> Self {
        Self {
            session,
            accepted_user: None,
        }
    }

    pub fn only_for(mut self, username: impl Into<String>) -> Self {
        self.accepted_user = Some(username.into());
        self
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn login(&self, credentials: &Credentials) -> Result<SessionData, AuthError> {
        match &self.accepted_user {
            Some(user) if *user != credentials.username => {
                Err(AuthError::Rejected(credentials.username.clone()))
            }
            _ => Ok(self.session.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const LINK: &str = "https://jobs.test/1";

    fn driver(page: PageFixture) -> FixtureDriver {
        FixtureDriver::new(HashMap::from([(LINK.to_string(), page)]))
    }

    #[tokio::test]
    async fn unknown_link_fails_navigation() {
        let d = driver(PageFixture::default());
        let err = d
            .navigate("https://jobs.test/missing", &NavigationPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DriverError::Network(_)));
    }

    #[tokio::test]
    async fn click_shows_confirmation_text() {
        let d = driver(PageFixture::default());
        let apply = PlatformConfig::default().apply_selector;
        d.navigate(LINK, &NavigationPolicy::default()).await.unwrap();
        let before = d.evaluate(PageProbe::ApplyStatus).await.unwrap();
        assert_eq!(before["appliedMarker"], false);
        d.dom_click(&apply).await.unwrap();
        let after = d.evaluate(PageProbe::ApplyStatus).await.unwrap();
        assert_eq!(after["appliedMarker"], false);
        assert_eq!(after["controlVisible"], true);
        let body = d.evaluate(PageProbe::BodyText).await.unwrap();
        assert!(body.as_str().unwrap().contains("You have successfully applied to"));
    }

    #[tokio::test]
    async fn missing_content_times_out() {
        let d = driver(PageFixture {
            content_ready: false,
            ..PageFixture::default()
        });
        let content = PlatformConfig::default().content_selector;
        d.navigate(LINK, &NavigationPolicy::default()).await.unwrap();
        let err = d
            .wait_for_selector(&content, WaitOptions::attached(Duration::from_secs(10)))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn static_provider_rejects_other_users() {
        let provider = StaticSessionProvider::new(SessionData::default()).only_for("me");
        assert!(provider.login(&Credentials::new("me", "pw")).await.is_ok());
        let err = provider
            .login(&Credentials::new("someone", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
    }

    #[test]
    fn fixture_document_uses_defaults() {
        let pages: HashMap<String, PageFixture> = serde_json::from_str(
            r#"{"https://jobs.test/1": {"already_applied": true}}"#,
        )
        .unwrap();
        let page = &pages["https://jobs.test/1"];
        assert!(page.already_applied);
        assert!(page.reachable);
        assert_eq!(page.click_outcome, ClickOutcome::Confirmed);
    }
}
