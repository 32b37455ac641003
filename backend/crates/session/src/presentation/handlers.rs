//! HTTP Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use std::sync::Arc;

use crate::application::{SignInInput, SignInUseCase, TokenIssuer};
use crate::domain::repository::PrincipalDirectory;
use crate::error::SessionResult;
use crate::presentation::dto::{
    LoginRequest, RefreshRequest, SessionInfoResponse, TokenPairResponse,
};
use crate::presentation::middleware::AuthenticatedPrincipal;

/// Shared state for session handlers
pub struct SessionAppState<D>
where
    D: PrincipalDirectory + Send + Sync + 'static,
{
    pub directory: Arc<D>,
    pub issuer: Arc<TokenIssuer>,
}

// Manual impl: `D` itself need not be `Clone` behind the `Arc`.
impl<D> Clone for SessionAppState<D>
where
    D: PrincipalDirectory + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<D>(
    State(state): State<SessionAppState<D>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> SessionResult<Json<TokenPairResponse>>
where
    D: PrincipalDirectory + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let use_case = SignInUseCase::new(state.directory.clone(), state.issuer.clone());

    let output = use_case
        .execute(SignInInput {
            identifier: req.identifier,
            secret: req.secret,
        })
        .await?;

    Ok(Json(output.tokens.into()))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /token/refresh
pub async fn refresh<D>(
    State(state): State<SessionAppState<D>>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> SessionResult<Json<TokenPairResponse>>
where
    D: PrincipalDirectory + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let tokens = state.issuer.refresh(&req.refresh_token)?;

    Ok(Json(tokens.into()))
}

// ============================================================================
// Current Session
// ============================================================================

/// GET /session (behind `require_access_token`)
pub async fn current_session(
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Json<SessionInfoResponse> {
    Json(SessionInfoResponse {
        principal_id: principal.principal_id,
        role: principal.role,
    })
}
