//! Moderation handlers. The permission decision happens in the service,
//! after the target has been loaded.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::request::TimeoutRequest;
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, parse_uuid};
use crate::state::AppState;

type UserJson = ApiResult<Json<ApiResponse<UserResponse>>>;

/// POST /api/moderation/timeout/{user_id}
pub async fn timeout_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    ValidJson(req): ValidJson<TimeoutRequest>,
) -> UserJson {
    let target = parse_uuid(&user_id)?;
    let user = state
        .moderation
        .timeout(&auth, target, &req.duration)
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /api/moderation/timeout/{user_id}
pub async fn remove_timeout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> UserJson {
    let target = parse_uuid(&user_id)?;
    let user = state.moderation.remove_timeout(&auth, target).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /api/moderation/timeouts
pub async fn list_timeouts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.moderation.list_timed_out(&auth).await?;
    Ok(Json(ApiResponse::ok(
        users.iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/moderation/deactivate/{user_id}
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> UserJson {
    let target = parse_uuid(&user_id)?;
    let user = state.moderation.deactivate(&auth, target).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/moderation/activate/{user_id}
pub async fn activate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> UserJson {
    let target = parse_uuid(&user_id)?;
    let user = state.moderation.activate(&auth, target).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/moderation/ban/{user_id}
pub async fn ban_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> UserJson {
    let target = parse_uuid(&user_id)?;
    let user = state.moderation.ban(&auth, target).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/moderation/unban/{user_id}
pub async fn unban_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> UserJson {
    let target = parse_uuid(&user_id)?;
    let user = state.moderation.unban(&auth, target).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /api/moderation/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id = parse_uuid(&comment_id)?;
    state.moderation.delete_comment(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Comment deleted"))))
}

/// DELETE /api/moderation/posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id = parse_uuid(&post_id)?;
    state.moderation.delete_post(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Post deleted"))))
}
