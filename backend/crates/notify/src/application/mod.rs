//! Application Layer

pub mod channel;
pub mod config;
pub mod poller;
