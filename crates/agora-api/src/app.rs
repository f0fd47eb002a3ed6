//! Application builder and server entry.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use agora_cache::CacheManager;
use agora_core::config::AppConfig;
use agora_core::error::AppError;
use agora_database::DatabasePool;
use agora_database::migration::run_migrations;
use agora_database::repositories::content::ContentRepository;
use agora_database::repositories::user::UserRepository;
use agora_service::TracingMailer;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    build_router(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
}

/// Connects the stores, wires the state and serves until the listener fails.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Agora v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    // ── Step 2: Counter store ────────────────────────────────────
    info!(provider = %config.cache.provider, "Initializing counter store");
    let counters = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 3: Repositories ─────────────────────────────────────
    let users = Arc::new(UserRepository::new(db.pool().clone()));
    let content = Arc::new(ContentRepository::new(db.pool().clone()));
    let mailer = Arc::new(TracingMailer::new(config.server.public_url.clone()));

    // ── Step 4: State + router ───────────────────────────────────
    let addr = config.server.bind_address();
    let state = AppState::new(config, users, content, counters, mailer)?;
    let app = build_app(state);

    // ── Step 5: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!(address = %addr, "Agora server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
