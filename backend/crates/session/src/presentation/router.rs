//! Session Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::TokenIssuer;
use crate::domain::repository::PrincipalDirectory;
use crate::infra::postgres::PgPrincipalDirectory;
use crate::presentation::handlers::{self, SessionAppState};
use crate::presentation::middleware::require_access_token;

/// Create the session router with the PostgreSQL directory
pub fn session_router(directory: PgPrincipalDirectory, issuer: Arc<TokenIssuer>) -> Router {
    session_router_generic(directory, issuer)
}

/// Create a session router for any directory implementation
pub fn session_router_generic<D>(directory: D, issuer: Arc<TokenIssuer>) -> Router
where
    D: PrincipalDirectory + Send + Sync + 'static,
{
    let state = SessionAppState {
        directory: Arc::new(directory),
        issuer: issuer.clone(),
    };

    let protected = Router::new()
        .route("/session", get(handlers::current_session))
        .route_layer(middleware::from_fn_with_state(issuer, require_access_token));

    Router::new()
        .route("/login", post(handlers::login::<D>))
        .route("/token/refresh", post(handlers::refresh::<D>))
        .with_state(state)
        .merge(protected)
}
