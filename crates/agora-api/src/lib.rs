//! # agora-api
//!
//! HTTP API layer for Agora built on Axum.
//!
//! Every request under `/api` passes the per-IP rate limiter; protected
//! routes then pass the session middleware, which may rotate the session
//! cookies, before reaching a handler.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
