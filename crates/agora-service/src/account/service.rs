//! Account lifecycle operations.
//!
//! Login is a sequential fallback chain with no backward jumps:
//! existing access token, then refresh token (with rotation), then
//! username/email and password.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::ValidateEmail;

use agora_auth::password::{PasswordHasher, PasswordValidator};
use agora_auth::session::{RefreshOutcome, SessionCredentials, SessionResolver, check_gates};
use agora_auth::token::{TokenClass, TokenPair, TokenService};
use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_database::store::UserStore;
use agora_entity::user::{NewUser, RoleLevel, User};

use super::mailer::Mailer;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;

/// Registration input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Credential login input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    pub identifier: String,
    /// Plaintext password.
    pub password: String,
}

/// Which step of the login chain succeeded.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// A valid access token was already presented; nothing to reissue.
    AlreadyAuthenticated(User),
    /// The refresh token was valid and has been rotated.
    Refreshed {
        /// The authenticated user.
        user: User,
        /// The rotated pair.
        tokens: TokenPair,
    },
    /// Username/email and password matched.
    Authenticated {
        /// The authenticated user.
        user: User,
        /// A new pair.
        tokens: TokenPair,
    },
}

impl LoginOutcome {
    /// The authenticated user.
    pub fn user(&self) -> &User {
        match self {
            Self::AlreadyAuthenticated(user) => user,
            Self::Refreshed { user, .. } | Self::Authenticated { user, .. } => user,
        }
    }

    /// Tokens to write back as cookies, if any were minted.
    pub fn tokens(&self) -> Option<&TokenPair> {
        match self {
            Self::AlreadyAuthenticated(_) => None,
            Self::Refreshed { tokens, .. } | Self::Authenticated { tokens, .. } => Some(tokens),
        }
    }
}

/// Registration, login, activation, and password reset.
#[derive(Debug, Clone)]
pub struct AccountService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Session resolver for the token steps of the login chain.
    sessions: Arc<SessionResolver>,
    /// Token service for activation and reset tokens.
    tokens: Arc<TokenService>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: Arc<PasswordValidator>,
    /// Outbound mail.
    mailer: Arc<dyn Mailer>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<SessionResolver>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let tokens = Arc::clone(sessions.tokens());
        Self {
            users,
            sessions,
            tokens,
            hasher,
            validator,
            mailer,
        }
    }

    /// Register a new, inactive account and mail its activation link.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        let username = req.username.trim();
        let email = req.email.trim();
        validate_username(username)?;
        check_email(email)?;
        self.validator.validate(&req.password, username)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict("Username is already taken").with_reason("username_taken"));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email is already in use").with_reason("email_taken"));
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role_level: RoleLevel::Normal,
                role_description: RoleLevel::Normal.default_description().to_string(),
                is_active: false,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        // The account stays; a new link can be requested via request_activation.
        let token = self.tokens.issue(TokenClass::Activation, user.id)?;
        if let Err(e) = self.mailer.send_activation(&user, &token).await {
            warn!(user_id = %user.id, error = %e, "Activation mail failed after registration");
        }

        Ok(user)
    }

    /// Run the login chain: access token, refresh token, then credentials.
    pub async fn login(
        &self,
        credentials: &SessionCredentials,
        login: Option<&LoginRequest>,
    ) -> AppResult<LoginOutcome> {
        let now = Utc::now();

        if let Some(user) = self
            .sessions
            .try_access(credentials.access_token.as_deref())
            .await?
        {
            check_gates(&user, now)?;
            return Ok(LoginOutcome::AlreadyAuthenticated(user));
        }

        match self
            .sessions
            .try_refresh(credentials.refresh_token.as_deref())
            .await?
        {
            RefreshOutcome::Rotated { user, tokens } => {
                check_gates(&user, now)?;
                info!(user_id = %user.id, "Login via refresh token");
                return Ok(LoginOutcome::Refreshed { user, tokens });
            }
            RefreshOutcome::Missing | RefreshOutcome::Rejected(_) => {}
        }

        let login = login.ok_or_else(|| {
            AppError::unauthorized("Username or email and password are required")
                .with_reason("credentials_required")
        })?;
        let user = self.authenticate(login).await?;
        check_gates(&user, now)?;

        let tokens = self.tokens.issue_pair(user.id)?;
        info!(user_id = %user.id, username = %user.username, "Login via credentials");
        Ok(LoginOutcome::Authenticated { user, tokens })
    }

    async fn authenticate(&self, login: &LoginRequest) -> AppResult<User> {
        let identifier = login.identifier.trim();
        let found = if identifier.contains('@') {
            self.users.find_by_email(identifier).await?
        } else {
            self.users.find_by_username(identifier).await?
        };

        let invalid = || {
            AppError::unauthorized("Invalid username or password").with_reason("invalid_credentials")
        };

        let Some(user) = found else {
            warn!(identifier, "Login for unknown account");
            return Err(invalid());
        };

        if !self.hasher.verify(&login.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(invalid());
        }

        Ok(user)
    }

    /// Mail a fresh activation link to an inactive, unbanned account.
    ///
    /// Unknown and already-active addresses succeed silently.
    pub async fn request_activation(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            return Ok(());
        };
        if user.is_active || user.banned {
            return Ok(());
        }

        let token = self.tokens.issue(TokenClass::Activation, user.id)?;
        self.mailer.send_activation(&user, &token).await
    }

    /// Activate the account named by an activation token.
    pub async fn activate(&self, token: &str) -> AppResult<User> {
        let user_id = self.tokens.verify(TokenClass::Activation, token)?;
        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::unauthorized("Activation link is no longer valid").with_reason("invalid_token")
        })?;

        if user.banned {
            return Err(AppError::forbidden("account banned").with_reason("account_banned"));
        }
        if user.is_active {
            return Err(AppError::conflict("Account is already active").with_reason("already_active"));
        }

        let user = self.users.set_active(user.id, true).await?;
        info!(user_id = %user.id, "Account activated");
        Ok(user)
    }

    /// Mail a password reset link when the address belongs to an account.
    ///
    /// Always succeeds for unknown addresses so callers cannot probe for accounts.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            info!("Password reset requested for unknown address");
            return Ok(());
        };

        let token = self.tokens.issue(TokenClass::PasswordReset, user.id)?;
        self.mailer.send_password_reset(&user, &token).await
    }

    /// Replace the password of the account named by a reset token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<User> {
        let user_id = self.tokens.verify(TokenClass::PasswordReset, token)?;
        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::unauthorized("Reset link is no longer valid").with_reason("invalid_token")
        })?;

        self.validator.validate(new_password, &user.username)?;
        let hash = self.hasher.hash(new_password)?;
        let user = self.users.update_password(user.id, &hash).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(user)
    }
}

fn validate_username(username: &str) -> AppResult<()> {
    let length = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
        return Err(AppError::validation(format!(
            "Username must be {USERNAME_MIN} to {USERNAME_MAX} characters"
        ))
        .with_reason("invalid_username"));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(AppError::validation(
            "Username may only contain letters, digits, '_' and '.'",
        )
        .with_reason("invalid_username"));
    }
    Ok(())
}

fn check_email(email: &str) -> AppResult<()> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AppError::validation("Invalid email address").with_reason("invalid_email"))
    }
}
