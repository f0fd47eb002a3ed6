//! Axum middleware stack.

pub mod rate_limit;
pub mod session;
