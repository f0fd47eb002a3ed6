//! Route definitions for the Agora HTTP API.
//!
//! All routes are mounted under `/api`. Every route except `/health` passes
//! the rate limiter; protected routes then pass the session middleware.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with its middleware and state.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(session_routes())
        .merge(moderation_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::require_session,
        ));

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(protected)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Public account endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/activation", post(handlers::auth::request_activation))
        .route("/auth/activate", post(handlers::auth::activate))
        .route("/auth/password/forgot", post(handlers::auth::forgot_password))
        .route("/auth/password/reset", post(handlers::auth::reset_password))
}

/// Endpoints that need a resolved session
fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(handlers::auth::me))
}

/// Moderation endpoints
fn moderation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/moderation/timeout/{user_id}",
            post(handlers::moderation::timeout_user).delete(handlers::moderation::remove_timeout),
        )
        .route("/moderation/timeouts", get(handlers::moderation::list_timeouts))
        .route(
            "/moderation/deactivate/{user_id}",
            post(handlers::moderation::deactivate_user),
        )
        .route(
            "/moderation/activate/{user_id}",
            post(handlers::moderation::activate_user),
        )
        .route("/moderation/ban/{user_id}", post(handlers::moderation::ban_user))
        .route("/moderation/unban/{user_id}", post(handlers::moderation::unban_user))
        .route(
            "/moderation/comments/{comment_id}",
            delete(handlers::moderation::delete_comment),
        )
        .route(
            "/moderation/posts/{post_id}",
            delete(handlers::moderation::delete_post),
        )
}

/// Health check, exempt from rate limiting
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
