//! Password policy for new passwords.

use agora_core::config::AuthConfig;
use agora_core::error::AppError;

/// Longest password accepted, bounding hashing cost.
const MAX_LENGTH: usize = 128;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Returns the first policy violation, if any.
    ///
    /// `username` is the account's handle; the password may not equal it.
    pub fn validate(&self, password: &str, username: &str) -> Result<(), AppError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            ))
            .with_reason("password_too_short"));
        }
        if length > MAX_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at most {MAX_LENGTH} characters long"
            ))
            .with_reason("password_too_long"));
        }
        if !password.chars().any(|c| c.is_alphabetic()) || !password.chars().any(|c| c.is_numeric())
        {
            return Err(AppError::validation(
                "Password must contain at least one letter and one digit",
            )
            .with_reason("password_too_weak"));
        }
        if password.eq_ignore_ascii_case(username) {
            return Err(AppError::validation("Password must not match the username")
                .with_reason("password_too_weak"));
        }
        Ok(())
    }
}
