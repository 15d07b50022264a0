use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::LoadState;
use crate::retry::{Backoff, RetryPolicy};
use crate::scoring::FallbackPolicy;

/// Cross-run application ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum confirmed applications over the counter lifetime.
    pub max_applications: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_applications: 50,
        }
    }
}

/// How eligibility is decided when the job page cannot be read.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EligibilityConfig {
    /// `permissive` treats unreadable pages as eligible; `conservative` skips them.
    pub fallback: FallbackPolicy,
    /// Optional skill model document (TOML). Built-in model when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
}

/// Driver wait budgets used by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// `network-idle` or `dom-content-loaded`.
    pub wait_until: LoadState,
    pub navigation_secs: u64,
    pub content_secs: u64,
    pub apply_control_secs: u64,
    /// Upper bound for the post-click confirmation poll.
    pub confirmation_timeout_ms: u64,
    pub confirmation_poll_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            wait_until: LoadState::NetworkIdle,
            navigation_secs: 60,
            content_secs: 10,
            apply_control_secs: 5,
            confirmation_timeout_ms: 1000,
            confirmation_poll_ms: 200,
        }
    }
}

/// Retry parameters for listing page loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per page (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry, in seconds.
    pub delay_secs: u64,
    /// `fixed` repeats `delay_secs`; `exponential` doubles it per attempt.
    pub backoff: Backoff,
    /// Cap for exponential delays. Never below `delay_secs`.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 5,
            backoff: Backoff::Fixed,
            max_delay_secs: 60,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs(self.delay_secs),
            max_delay: Duration::from_secs(self.max_delay_secs.max(self.delay_secs)),
            backoff: self.backoff,
        }
    }
}

/// Randomized delay between successive listing pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_page_delay_ms: u64,
    pub max_page_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_page_delay_ms: 3000,
            max_page_delay_ms: 5000,
        }
    }
}

/// Platform-specific selectors and phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub base_url: String,
    /// Element that holds the job description once the page has rendered.
    pub content_selector: String,
    pub apply_selector: String,
    /// Body text that marks a successful click.
    pub success_marker: String,
    /// Body text that confirms the platform accepted the application.
    pub confirmation_phrase: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.naukri.com".to_string(),
            content_selector: ".styles_JDC__dang-inner-html__h0K4t".to_string(),
            apply_selector: "#apply-button, .apply-button".to_string(),
            success_marker: "successfully applied".to_string(),
            confirmation_phrase: "You have successfully applied to".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/autoapply/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AutoApplyConfig {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub eligibility: EligibilityConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("autoapply")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AutoApplyConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AutoApplyConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit path (no defaults file is written).
pub fn load_from_path(path: &Path) -> Result<AutoApplyConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AutoApplyConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
