//! Accident Severity Cloud Server
//!
//! Backend for the accident severity predictor: accounts and sessions,
//! prediction persistence and history, and the admin aggregate view.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ACCIDENT SEVERITY CLOUD                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Auth     │  │  Prediction Service     │ │
//! │  │  Gateway  │  │  Sessions │  │  (severity-core,        │ │
//! │  │  (Axum)   │  │  (JWT)    │  │   single-flight)        │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │                ┌─────────────┐                             │
//! │                │ PostgreSQL  │                             │
//! │                └─────────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod middleware;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tokio::sync::broadcast;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use severity_core::PredictionService;

use handlers::auth::SessionEvent;

pub use error::{AppError, AppResult};

/// Buffered session events before slow listeners start lagging
const SESSION_FEED_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "severity_cloud=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Accident Severity Cloud Server starting ({})...", config.environment);
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

    if config.is_production() && config.jwt_secret.starts_with("severity-dev-secret") {
        tracing::warn!("JWT_SECRET is not set; using the development secret in production");
    }

    let pool = db::create_pool(&config.database_url).await
        .context("failed to create database pool")?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await
        .context("failed to run migrations")?;

    let state = AppState::new(pool, config.clone());
    spawn_session_logger(state.sessions.subscribe());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await
        .context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: config::Config,
    pub predictor: Arc<PredictionService>,
    pub sessions: broadcast::Sender<SessionEvent>,
}

impl AppState {
    pub fn new(pool: sqlx::PgPool, config: config::Config) -> Self {
        let predictor = PredictionService::random().with_latency(config.prediction_latency());
        let (sessions, _) = broadcast::channel(SESSION_FEED_CAPACITY);

        Self {
            pool,
            config,
            predictor: Arc::new(predictor),
            sessions,
        }
    }
}

/// Log every sign-in and sign-out published on the session feed
fn spawn_session_logger(mut events: broadcast::Receiver<SessionEvent>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn(session)) => {
                    tracing::info!(
                        "Session started: {} ({}), expires {}",
                        session.email, session.user_id, session.expires_at
                    );
                }
                Ok(SessionEvent::SignedOut { user_id, email }) => {
                    tracing::info!("Session ended: {} ({})", email, user_id);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Session logger skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/signup", post(handlers::auth::signup))
        .route("/api/v1/auth/signin", post(handlers::auth::signin))
        .route("/api/v1/conditions", get(handlers::conditions::list));

    // Session routes (user JWT auth)
    let session_routes = Router::new()
        .route("/api/v1/auth/signout", post(handlers::auth::signout))
        .route("/api/v1/auth/session", get(handlers::auth::session))

        // Predictions & history
        .route("/api/v1/predictions", post(handlers::predictions::create))
        .route("/api/v1/predictions", get(handlers::predictions::list))
        .route("/api/v1/predictions/:id", get(handlers::predictions::get))

        // Admin
        .route("/api/v1/admin/stats", get(handlers::admin::stats))

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
