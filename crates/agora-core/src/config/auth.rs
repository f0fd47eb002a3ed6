//! Authentication configuration.
//!
//! Token lifetimes are fixed policy and live next to the token classes in
//! `agora-auth`; only the signing secrets are deployment configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Authentication and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    pub access_secret: String,
    /// HMAC secret for refresh tokens.
    pub refresh_secret: String,
    /// HMAC secret for password-reset tokens.
    pub reset_secret: String,
    /// HMAC secret for account-activation tokens.
    pub activation_secret: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Whether session cookies carry the `Secure` attribute.
    #[serde(default = "default_true")]
    pub secure_cookies: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password_min_length", &self.password_min_length)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    /// Checks that every token class has its own non-empty secret.
    pub fn validate(&self) -> Result<(), AppError> {
        let secrets = [
            ("access", &self.access_secret),
            ("refresh", &self.refresh_secret),
            ("reset", &self.reset_secret),
            ("activation", &self.activation_secret),
        ];

        for (name, secret) in &secrets {
            if secret.trim().is_empty() {
                return Err(AppError::configuration(format!(
                    "auth.{name}_secret must not be empty"
                )));
            }
        }

        for (i, (a_name, a)) in secrets.iter().enumerate() {
            for (b_name, b) in &secrets[i + 1..] {
                if a == b {
                    return Err(AppError::configuration(format!(
                        "auth.{a_name}_secret and auth.{b_name}_secret must differ"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn default_password_min() -> usize {
    8
}

fn default_true() -> bool {
    true
}
