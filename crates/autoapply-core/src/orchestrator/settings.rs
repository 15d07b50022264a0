use std::time::Duration;

use crate::config::{AutoApplyConfig, PlatformConfig};
use crate::driver::NavigationPolicy;
use crate::wait::PollSpec;

/// Timeouts, selectors and phrases the apply sequence runs with.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub navigation: NavigationPolicy,
    pub content_timeout: Duration,
    pub apply_control_timeout: Duration,
    /// Post-click wait for the success or already-applied marker.
    pub confirmation: PollSpec,
    pub platform: PlatformConfig,
}

impl OrchestratorSettings {
    pub fn from_config(cfg: &AutoApplyConfig) -> Self {
        let t = &cfg.timeouts;
        Self {
            navigation: NavigationPolicy::new(
                t.wait_until,
                Duration::from_secs(t.navigation_secs),
            ),
            content_timeout: Duration::from_secs(t.content_secs),
            apply_control_timeout: Duration::from_secs(t.apply_control_secs),
            confirmation: PollSpec::new(
                Duration::from_millis(t.confirmation_timeout_ms),
                Duration::from_millis(t.confirmation_poll_ms.max(1)),
            ),
            platform: cfg.platform.clone(),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&AutoApplyConfig::default())
    }
}
