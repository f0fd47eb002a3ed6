//! Session resolution middleware for protected routes.
//!
//! Resolves the cookies into a user, attaches an [`AuthUser`], runs the
//! handler, and writes rotated cookies onto whatever the handler returned.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use agora_auth::session::ResolvedSession;
use agora_service::context::RequestContext;

use crate::cookies::{clear_session_cookies, credentials_from_jar, set_session_cookies};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::request_client_ip;
use crate::state::AppState;

/// Require a resolvable session.
///
/// A refresh cookie that was presented and rejected clears both cookies
/// on the `401` response.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let secure = state.config.auth.secure_cookies;
    let credentials = credentials_from_jar(&jar);

    let ResolvedSession { user, rotated } = match state.sessions.resolve(&credentials).await {
        Ok(session) => session,
        Err(err) => {
            debug!(error = %err, path = %request.uri().path(), "Session rejected");
            let clear = err.clears_cookies();
            let api = ApiError::from(err);
            return if clear {
                (clear_session_cookies(jar, secure), api).into_response()
            } else {
                api.into_response()
            };
        }
    };

    let ip = request_client_ip(&request);
    let user_id = user.id;
    let context = RequestContext::new(&user, Some(ip));
    request.extensions_mut().insert(AuthUser { user, context });

    let response = next.run(request).await;

    match rotated {
        Some(tokens) => {
            info!(user_id = %user_id, "Session rotated");
            (set_session_cookies(jar, &tokens, secure), response).into_response()
        }
        None => response,
    }
}
