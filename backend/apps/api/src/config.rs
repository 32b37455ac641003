//! Gateway Configuration
//!
//! Everything the binary reads from the environment. A missing signing key
//! or database URL stops startup.

use std::net::SocketAddr;

use notify::NotifyConfig;
use platform::config::{ConfigError, Env};
use session::SessionConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub session: SessionConfig,
    pub notify: NotifyConfig,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins
    pub frontend_origins: Vec<String>,
}

impl GatewayConfig {
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let session = SessionConfig::from_env(env)?;
        let notify = NotifyConfig::from_env(env)?;
        let database_url = env.require("DATABASE_URL")?;

        let bind_addr = env
            .get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::invalid("BIND_ADDR", e.to_string()))?;

        let frontend_origins = env
            .get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            session,
            notify,
            database_url,
            bind_addr,
            frontend_origins,
        })
    }
}
