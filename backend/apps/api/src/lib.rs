//! API Gateway Library
//!
//! Router composition and configuration for the `api` binary.

pub mod config;
pub mod confirmation;
pub mod gateway;

pub use config::GatewayConfig;
pub use gateway::gateway_router;

#[cfg(test)]
mod tests;
