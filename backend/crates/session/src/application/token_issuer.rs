//! Token Issuer
//!
//! Creates and verifies access/refresh token pairs. Stateless: no storage,
//! no I/O, only signing and verification.
//!
//! Tokens are HS256 JWTs carrying [`TokenClaims`]. Expiry is checked here
//! against the injected clock rather than by the JWT library.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use platform::clock::Clock;
use platform::crypto;

use crate::application::config::{MAX_TOKEN_TTL_SECS, SessionConfig};
use crate::domain::entity::principal::Principal;
use crate::domain::entity::token::{TokenClaims, TokenPair, VerifiedToken};
use crate::domain::value_object::{
    principal_id::PrincipalId, role::Role, token_kind::TokenKind,
};
use crate::error::{SessionError, SessionResult};

/// Random token id length in bytes
const JTI_BYTES: usize = 16;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token issuer
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keys", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        let secret = config.signing_key.expose_bytes();

        // Expiry goes through the clock so tests can move time
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            clock,
        }
    }

    /// Issue a fresh pair for an already-authenticated principal
    pub fn issue(&self, principal: &Principal) -> SessionResult<TokenPair> {
        self.issue_for(principal.id, principal.role)
    }

    /// Verify a token of the expected kind.
    ///
    /// Check order is signature, then kind, then expiry: a token of the wrong
    /// kind reports `WrongKind` even when it has also expired.
    pub fn verify(&self, token: &str, expected: TokenKind) -> SessionResult<VerifiedToken> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                SessionError::MalformedToken
            })?
            .claims;

        if claims.kind != expected {
            return Err(SessionError::WrongKind);
        }

        if self.clock.now().timestamp() >= claims.exp {
            return Err(SessionError::ExpiredToken);
        }

        // Access tokens must always say who the principal is acting as
        if claims.kind == TokenKind::Access && claims.role.is_none() {
            return Err(SessionError::MalformedToken);
        }

        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(SessionError::MalformedToken)?;

        Ok(VerifiedToken {
            principal_id: claims.sub,
            role: claims.role,
            kind: claims.kind,
            expires_at,
        })
    }

    /// Trade a valid refresh token for a new pair
    pub fn refresh(&self, refresh_token: &str) -> SessionResult<TokenPair> {
        let verified = self.verify(refresh_token, TokenKind::Refresh)?;
        let role = verified.role.ok_or(SessionError::MalformedToken)?;

        tracing::debug!(principal_id = %verified.principal_id, "Refreshing token pair");

        self.issue_for(verified.principal_id, role)
    }

    fn issue_for(&self, principal_id: PrincipalId, role: Role) -> SessionResult<TokenPair> {
        let now = self.clock.now().timestamp();

        let access_token = self.sign(&TokenClaims {
            sub: principal_id,
            role: Some(role),
            kind: TokenKind::Access,
            iat: now,
            exp: expiry(now, self.access_ttl),
            jti: new_jti(),
        })?;

        // Role rides along so refresh never needs the user store
        let refresh_token = self.sign(&TokenClaims {
            sub: principal_id,
            role: Some(role),
            kind: TokenKind::Refresh,
            iat: now,
            exp: expiry(now, self.refresh_ttl),
            jti: new_jti(),
        })?;

        tracing::debug!(principal_id = %principal_id, role = %role, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    fn sign(&self, claims: &TokenClaims) -> SessionResult<String> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| SessionError::Internal(format!("Failed to sign token: {e}")))
    }
}

fn expiry(now: i64, ttl: Duration) -> i64 {
    let secs = ttl.as_secs().min(MAX_TOKEN_TTL_SECS);
    now.saturating_add(i64::try_from(secs).unwrap_or(i64::MAX))
}

fn new_jti() -> String {
    crypto::to_base64url(&crypto::random_bytes(JTI_BYTES))
}
