//! Notify Configuration

use std::time::Duration;

use platform::config::{ConfigError, Env};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_WATCH_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_RETRY_BUDGET: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Delay between two checks of one watch
    pub poll_interval: Duration,
    /// Hard upper bound on a watch's lifetime
    pub watch_timeout: Duration,
    /// Consecutive transient failures tolerated before giving up
    pub retry_budget: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            watch_timeout: Duration::from_secs(DEFAULT_WATCH_TIMEOUT_SECS),
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }
}

impl NotifyConfig {
    /// Load from `POLL_INTERVAL_MS`, `WATCH_TIMEOUT_SECS`, `RETRY_BUDGET`
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let poll_interval = env.millis_or("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        let watch_timeout = env.secs_or("WATCH_TIMEOUT_SECS", DEFAULT_WATCH_TIMEOUT_SECS)?;
        let retry_budget = env.parse_or("RETRY_BUDGET", DEFAULT_RETRY_BUDGET)?;

        if poll_interval >= watch_timeout {
            return Err(ConfigError::invalid(
                "POLL_INTERVAL_MS",
                "must be shorter than WATCH_TIMEOUT_SECS",
            ));
        }

        Ok(Self {
            poll_interval,
            watch_timeout,
            retry_budget,
        })
    }
}
