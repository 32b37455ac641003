//! Application Configuration
//!
//! Configuration for the session application layer.

use std::time::Duration;

use platform::config::{ConfigError, Env};
use platform::crypto::SigningKey;

/// Default access token TTL (1 hour)
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 3600;
/// Default refresh token TTL (30 days)
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;
/// Longest accepted TTL for either kind (10 years)
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

/// Session application configuration
///
/// There is deliberately no `Default`: the signing key must be supplied.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Access token validity window
    pub access_token_ttl: Duration,
    /// Refresh token validity window
    pub refresh_token_ttl: Duration,
    /// HMAC key for token signatures
    pub signing_key: SigningKey,
}

impl SessionConfig {
    /// Config with default TTLs around the given key
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            access_token_ttl: Duration::from_secs(DEFAULT_ACCESS_TOKEN_TTL_SECS),
            refresh_token_ttl: Duration::from_secs(DEFAULT_REFRESH_TOKEN_TTL_SECS),
            signing_key,
        }
    }

    /// Load from `SESSION_SIGNING_KEY`, `ACCESS_TOKEN_TTL_SECS`, `REFRESH_TOKEN_TTL_SECS`
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let raw_key = env.require("SESSION_SIGNING_KEY")?;
        let signing_key = SigningKey::from_base64(&raw_key)
            .map_err(|e| ConfigError::invalid("SESSION_SIGNING_KEY", e.to_string()))?;

        let access_token_ttl = env.secs_or("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TOKEN_TTL_SECS)?;
        let refresh_token_ttl =
            env.secs_or("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TOKEN_TTL_SECS)?;

        for (name, ttl) in [
            ("ACCESS_TOKEN_TTL_SECS", access_token_ttl),
            ("REFRESH_TOKEN_TTL_SECS", refresh_token_ttl),
        ] {
            if ttl.as_secs() > MAX_TOKEN_TTL_SECS {
                return Err(ConfigError::invalid(
                    name,
                    format!("must be at most {MAX_TOKEN_TTL_SECS} seconds"),
                ));
            }
        }

        if refresh_token_ttl <= access_token_ttl {
            return Err(ConfigError::invalid(
                "REFRESH_TOKEN_TTL_SECS",
                "must be longer than ACCESS_TOKEN_TTL_SECS",
            ));
        }

        Ok(Self {
            access_token_ttl,
            refresh_token_ttl,
            signing_key,
        })
    }

    pub fn with_ttls(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_ttl = access;
        self.refresh_token_ttl = refresh;
        self
    }
}
