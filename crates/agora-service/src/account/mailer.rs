//! Outbound account mail.

use async_trait::async_trait;
use tracing::info;

use agora_core::result::AppResult;
use agora_entity::user::User;

/// Delivers activation and password-reset links.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Send the account activation link.
    async fn send_activation(&self, user: &User, token: &str) -> AppResult<()>;

    /// Send the password reset link.
    async fn send_password_reset(&self, user: &User, token: &str) -> AppResult<()>;
}

/// Mailer that writes links to the log instead of sending mail.
#[derive(Debug, Clone)]
pub struct TracingMailer {
    public_url: String,
}

impl TracingMailer {
    /// Creates a mailer that builds links under `public_url`.
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Activation link for a token.
    pub fn activation_link(&self, token: &str) -> String {
        format!("{}/api/auth/activate?token={token}", self.public_url)
    }

    /// Password reset link for a token.
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={token}", self.public_url)
    }
}

#[async_trait]
impl Mailer for TracingMailer {
    async fn send_activation(&self, user: &User, token: &str) -> AppResult<()> {
        info!(
            user_id = %user.id,
            email = %user.email,
            link = %self.activation_link(token),
            "Activation mail"
        );
        Ok(())
    }

    async fn send_password_reset(&self, user: &User, token: &str) -> AppResult<()> {
        info!(
            user_id = %user.id,
            email = %user.email,
            link = %self.reset_link(token),
            "Password reset mail"
        );
        Ok(())
    }
}
