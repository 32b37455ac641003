//! Environment Configuration
//!
//! Typed lookups over process environment variables. Missing required
//! values and unparsable values are errors; nothing falls back silently.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Variable source (process environment, or a fixed map in tests)
#[derive(Debug, Clone, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Read from the process environment
    pub fn process() -> Self {
        Self { overrides: None }
    }

    /// Read only from the given pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            overrides: Some(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Raw lookup; empty values count as unset
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    pub fn require(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    pub fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(name, e.to_string())),
            None => Ok(default),
        }
    }

    /// Non-zero duration given in whole seconds
    pub fn secs_or(&self, name: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
        let secs: u64 = self.parse_or(name, default_secs)?;
        non_zero(name, Duration::from_secs(secs))
    }

    /// Non-zero duration given in milliseconds
    pub fn millis_or(
        &self,
        name: &'static str,
        default_millis: u64,
    ) -> Result<Duration, ConfigError> {
        let millis: u64 = self.parse_or(name, default_millis)?;
        non_zero(name, Duration::from_millis(millis))
    }
}

fn non_zero(name: &'static str, value: Duration) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::invalid(name, "must be greater than zero"));
    }
    Ok(value)
}
