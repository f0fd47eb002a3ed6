//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use agora_service::account::service as account;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Email is not a valid address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<RegisterRequest> for account::RegisterRequest {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

/// Credential login body; optional when a session cookie is present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email address.
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub identifier: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<LoginRequest> for account::LoginRequest {
    fn from(req: LoginRequest) -> Self {
        Self {
            identifier: req.identifier,
            password: req.password,
        }
    }
}

/// Body naming an account by email (activation and reset requests).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailRequest {
    /// Email address.
    #[validate(email(message = "Email is not a valid address"))]
    pub email: String,
}

/// Password reset completion.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Reset token from the mailed link.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// New password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub new_password: String,
}

/// Timeout request body, e.g. `{"duration": "1h"}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TimeoutRequest {
    /// Duration such as `90s`, `15m` or `1h30m`.
    #[validate(length(min = 1, max = 32, message = "Duration is required"))]
    pub duration: String,
}

/// `?token=` query parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenQuery {
    /// The token.
    pub token: String,
}
