//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, Base64url, signing keys)
//! - Secret hashing (Argon2id, zeroized clear text)
//! - Clock abstraction (system clock, manual clock for tests)
//! - Environment configuration helpers

pub mod clock;
pub mod config;
pub mod crypto;
pub mod password;
