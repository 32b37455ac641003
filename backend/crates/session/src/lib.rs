//! Session (Token Issuance) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Principals, token claims, directory trait
//! - `application/` - Token issuer and sign-in use case
//! - `infra/` - In-memory and PostgreSQL principal directories
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Features
//! - Sign-in with identifier + secret, answered with an access/refresh pair
//! - Stateless refresh: a valid refresh token buys a fresh pair
//! - Bearer-token middleware for routes that need an authenticated principal
//!
//! ## Security Model
//! - Tokens are HMAC-SHA256 signed; the key only ever comes from configuration
//! - Secrets are Argon2id hashed and zeroized after use
//! - Credential failures never reveal whether the identifier or the secret was wrong
//! - No revocation list: a leaked refresh token stays valid until it expires

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SessionConfig;
pub use application::token_issuer::TokenIssuer;
pub use error::{SessionError, SessionResult};
pub use infra::memory::InMemoryPrincipalDirectory;
pub use infra::postgres::PgPrincipalDirectory;
pub use presentation::router::{session_router, session_router_generic};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
