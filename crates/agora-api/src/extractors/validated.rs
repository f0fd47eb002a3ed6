//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use agora_core::error::AppError;

use crate::error::ApiError;

/// `Json<T>` whose rules have been checked.
///
/// Malformed bodies and failed rules both become `VALIDATION_ERROR`
/// responses in the standard error shape.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError(AppError::validation(rejection.body_text()).with_reason("invalid_body"))
        })?;

        value.validate().map_err(|e| {
            ApiError(AppError::validation(e.to_string()).with_reason("invalid_request"))
        })?;

        Ok(Self(value))
    }
}
