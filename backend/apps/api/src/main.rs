//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::sync::Arc;

use api::{GatewayConfig, gateway_router};
use axum::{
    Json, Router,
    extract::State,
    http::{self, Method, header},
    routing::get,
};
use kernel::error::app_error::AppError;
use notify::NotificationChannel;
use platform::clock::SystemClock;
use platform::config::Env;
use session::{PgPrincipalDirectory, TokenIssuer};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,session=info,notify=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // No fallback values for secrets: a missing key ends startup here
    let config = GatewayConfig::from_env(&Env::process())?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    let issuer = Arc::new(TokenIssuer::new(&config.session, Arc::new(SystemClock)));
    let channel = NotificationChannel::new();

    tracing::info!(
        access_ttl_secs = config.session.access_token_ttl.as_secs(),
        refresh_ttl_secs = config.session.refresh_token_ttl.as_secs(),
        poll_interval_ms = config.notify.poll_interval.as_millis() as u64,
        watch_timeout_secs = config.notify.watch_timeout.as_secs(),
        retry_budget = config.notify.retry_budget,
        "Gateway configured"
    );

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/health", get(health).with_state(pool.clone()))
        .merge(gateway_router(
            PgPrincipalDirectory::new(pool),
            issuer,
            channel,
            config.notify,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health - readiness, including the user store
async fn health(State(pool): State<PgPool>) -> Result<Json<serde_json::Value>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Health check failed");
            AppError::service_unavailable("Database unreachable").with_source(e)
        })?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
