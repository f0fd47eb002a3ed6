//! Account handlers: register, login, logout, me, activation and password reset.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use tracing::info;
use validator::Validate;

use agora_core::error::AppError;
use agora_service::account::service as account;

use crate::cookies::{clear_session_cookies, credentials_from_jar, set_session_cookies};
use crate::dto::request::{
    EmailRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenQuery,
};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.accounts.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// POST /api/auth/login
///
/// The body is optional: a valid access or refresh cookie logs in without
/// credentials.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> ApiResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    let credentials = credentials_from_jar(&jar);
    let login: Option<account::LoginRequest> = parse_login_body(&body)?.map(Into::into);

    let outcome = state.accounts.login(&credentials, login.as_ref()).await?;

    let jar = match outcome.tokens() {
        Some(tokens) => set_session_cookies(jar, tokens, state.config.auth.secure_cookies),
        None => jar,
    };

    let response = LoginResponse {
        user: outcome.user().into(),
        access_expires_at: outcome.tokens().map(|t| t.access_expires_at),
        refresh_expires_at: outcome.tokens().map(|t| t.refresh_expires_at),
    };
    Ok((jar, Json(ApiResponse::ok(response))))
}

fn parse_login_body(body: &[u8]) -> Result<Option<LoginRequest>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let req: LoginRequest = serde_json::from_slice(body).map_err(|e| {
        AppError::validation(format!("Invalid login body: {e}")).with_reason("invalid_body")
    })?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()).with_reason("invalid_request"))?;
    Ok(Some(req))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    info!("Session cookies cleared");
    (
        clear_session_cookies(jar, state.config.auth.secure_cookies),
        Json(ApiResponse::ok(MessageResponse::new("Logged out successfully"))),
    )
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(UserResponse::from(&auth.user)))
}

/// POST /api/auth/activation
pub async fn request_activation(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<EmailRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.accounts.request_activation(&req.email).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(MessageResponse::new(
            "If the account exists and is not active, an activation link has been sent",
        ))),
    ))
}

/// POST /api/auth/activate?token=
pub async fn activate(
    State(state): State<AppState>,
    query: Result<Query<TokenQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let Query(query) = query.map_err(|e| {
        AppError::validation(e.body_text()).with_reason("invalid_request")
    })?;
    let user = state.accounts.activate(&query.token).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/auth/password/forgot
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<EmailRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.accounts.forgot_password(&req.email).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(MessageResponse::new(
            "If the account exists, a password reset link has been sent",
        ))),
    ))
}

/// POST /api/auth/password/reset
pub async fn reset_password(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ResetPasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .accounts
        .reset_password(&req.token, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password has been reset",
    ))))
}
