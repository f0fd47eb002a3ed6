//! Per-IP admission control middleware.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::RETRY_AFTER;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use agora_auth::throttle::Admission;
use agora_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::request_client_ip;
use crate::state::AppState;

/// Counts the request against the client's window and rejects with
/// `429` and `Retry-After` once the limit is exceeded.
///
/// A counter store failure rejects the request with `500`.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.limiter.is_enabled() {
        return next.run(request).await;
    }

    let ip = request_client_ip(&request);

    match state.limiter.check(&ip).await {
        Ok(Admission::Admit { remaining }) => {
            debug!(client_ip = %ip, remaining, "Request admitted");
            next.run(request).await
        }
        Ok(Admission::Reject { retry_after }) => {
            warn!(client_ip = %ip, retry_after, path = %request.uri().path(), "Rate limit exceeded");
            let err = ApiError(
                AppError::rate_limited(format!("Too many requests, retry in {retry_after}s"))
                    .with_reason("rate_limited"),
            );
            let mut response = err.into_response();
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
            response
        }
        Err(e) => ApiError(e).into_response(),
    }
}
