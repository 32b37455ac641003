//! Token Entities
//!
//! Claims carried inside signed tokens and the pair handed to clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    principal_id::PrincipalId, role::Role, token_kind::TokenKind,
};

/// Access/refresh token pair. Immutable once issued.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Principal id (string on the wire)
    pub sub: PrincipalId,
    /// Role at issue time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub kind: TokenKind,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds); the token is dead from this instant on
    pub exp: i64,
    /// Random token id
    pub jti: String,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub principal_id: PrincipalId,
    pub role: Option<Role>,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}
