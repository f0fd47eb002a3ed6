//! `AuthUser` extractor: the identity attached by the session middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use agora_core::error::AppError;
use agora_entity::user::User;
use agora_service::context::RequestContext;

use crate::error::ApiError;

/// Authenticated user available in handlers behind the session middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The resolved user row.
    pub user: User,
    /// Context passed to services.
    pub context: RequestContext,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| {
                ApiError(AppError::unauthorized("authentication required").with_reason("unauthenticated"))
            })
    }
}
