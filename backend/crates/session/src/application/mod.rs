//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod sign_in;
pub mod token_issuer;

// Re-exports
pub use config::SessionConfig;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use token_issuer::TokenIssuer;
