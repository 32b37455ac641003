//! Bearer Token Middleware
//!
//! Guards routes that need an authenticated principal.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::TokenIssuer;
use crate::domain::value_object::{
    principal_id::PrincipalId, role::Role, token_kind::TokenKind,
};
use crate::error::SessionError;

/// Principal resolved from a valid access token, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub principal_id: PrincipalId,
    pub role: Role,
}

/// Middleware that requires a valid access token.
///
/// Use with `axum::middleware::from_fn_with_state(issuer, require_access_token)`.
pub async fn require_access_token(
    State(issuer): State<Arc<TokenIssuer>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, SessionError> {
    let token = bearer_token(req.headers()).ok_or(SessionError::MissingToken)?;

    let verified = issuer.verify(token, TokenKind::Access)?;
    let role = verified.role.ok_or(SessionError::MalformedToken)?;

    req.extensions_mut().insert(AuthenticatedPrincipal {
        principal_id: verified.principal_id,
        role,
    });

    Ok(next.run(req).await)
}

/// Extract the credential from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
