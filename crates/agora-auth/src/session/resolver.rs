//! Session resolution state machine.
//!
//! ```text
//! NoCredentials ──access ok──────────────────────────────▶ Resolved
//!       │
//!       └─access missing/invalid/unknown user──▶ refresh ok ──rotate──▶ Resolved
//!                                                   │
//!                                                   └──▶ Rejected
//! ```
//!
//! A resolved user then passes the account gates (banned, inactive,
//! timed out) before the request continues.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_database::store::UserStore;
use agora_entity::user::{AccountStatus, User};

use crate::token::{TokenClass, TokenError, TokenPair, TokenService};

/// Raw cookie values presented with a request.
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials {
    /// Value of the `access_token` cookie.
    pub access_token: Option<String>,
    /// Value of the `refresh_token` cookie.
    pub refresh_token: Option<String>,
}

impl SessionCredentials {
    /// Whether no session cookie was presented at all.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Why a presented refresh token could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    /// The token did not verify as a refresh token.
    #[error("{0}")]
    Token(TokenError),
    /// The token verified but its subject no longer exists.
    #[error("unknown subject")]
    UnknownSubject,
}

/// Outcome of the refresh step.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The refresh token was valid; a new pair has been minted.
    Rotated {
        /// The user the token belongs to.
        user: User,
        /// The replacement access and refresh tokens.
        tokens: TokenPair,
    },
    /// No refresh token was presented.
    Missing,
    /// A refresh token was presented but is unusable.
    Rejected(RefreshFailure),
}

/// Account gate that stopped an otherwise authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    /// The account is banned.
    #[error("account banned")]
    Banned,
    /// The account is not activated or was deactivated.
    #[error("account not active")]
    Inactive,
    /// The account is timed out.
    #[error("account timeout")]
    TimedOut {
        /// When the timeout ends.
        until: DateTime<Utc>,
    },
}

impl GateRejection {
    /// Machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Banned => "account_banned",
            Self::Inactive => "account_not_active",
            Self::TimedOut { .. } => "account_timeout",
        }
    }
}

/// Terminal rejection of session resolution.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No usable access token and no refresh token.
    #[error("authentication required")]
    Unauthenticated,
    /// A refresh token was presented but failed; the client's cookies are stale.
    #[error("refresh token rejected: {0}")]
    RefreshRejected(RefreshFailure),
    /// The identity resolved but an account gate refused it.
    #[error("{0}")]
    Gate(GateRejection),
    /// The user store failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl SessionError {
    /// Whether the response should also clear both session cookies.
    pub fn clears_cookies(&self) -> bool {
        matches!(self, Self::RefreshRejected(_))
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthenticated => {
                AppError::unauthorized("authentication required").with_reason("unauthenticated")
            }
            SessionError::RefreshRejected(_) => {
                AppError::unauthorized("session expired, please log in again")
                    .with_reason("invalid_refresh_token")
            }
            SessionError::Gate(gate) => gate.into(),
            SessionError::Store(err) => err,
        }
    }
}

/// A successfully resolved request identity.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// The authenticated user.
    pub user: User,
    /// Replacement tokens when the refresh path was taken; the caller must
    /// write them back as cookies.
    pub rotated: Option<TokenPair>,
}

/// Resolves request cookies into an authenticated user.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserStore>,
}

impl SessionResolver {
    /// Creates a resolver over a token service and a user store.
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    /// The token service used for verification and rotation.
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Access step: `Some(user)` when the token verifies and names a known user.
    ///
    /// Missing, invalid, and unknown-subject tokens all yield `None` so the
    /// caller can fall through to the refresh step. Store failures are errors.
    pub async fn try_access(&self, token: Option<&str>) -> AppResult<Option<User>> {
        let Some(token) = token else {
            return Ok(None);
        };

        let subject = match self.tokens.verify(TokenClass::Access, token) {
            Ok(subject) => subject,
            Err(e) => {
                debug!(error = %e, "Access token unusable");
                return Ok(None);
            }
        };

        let user = self.users.find_by_id(subject).await?;
        if user.is_none() {
            info!(user_id = %subject, "Verified access token names an unknown user");
        }
        Ok(user)
    }

    /// Refresh step: verify the refresh token, look up its subject, and
    /// rotate to a fresh access/refresh pair.
    pub async fn try_refresh(&self, token: Option<&str>) -> AppResult<RefreshOutcome> {
        let Some(token) = token else {
            return Ok(RefreshOutcome::Missing);
        };

        let subject = match self.tokens.verify(TokenClass::Refresh, token) {
            Ok(subject) => subject,
            Err(e) => {
                debug!(error = %e, "Refresh token rejected");
                return Ok(RefreshOutcome::Rejected(RefreshFailure::Token(e)));
            }
        };

        let Some(user) = self.users.find_by_id(subject).await? else {
            warn!(user_id = %subject, "Refresh token names an unknown user");
            return Ok(RefreshOutcome::Rejected(RefreshFailure::UnknownSubject));
        };

        let tokens = self.tokens.issue_pair(user.id)?;
        debug!(user_id = %user.id, "Rotated session tokens");
        Ok(RefreshOutcome::Rotated { user, tokens })
    }

    /// Resolve a request's cookies at the current time.
    pub async fn resolve(&self, credentials: &SessionCredentials) -> Result<ResolvedSession, SessionError> {
        self.resolve_at(credentials, Utc::now()).await
    }

    /// Resolve a request's cookies, evaluating timeouts against `now`.
    pub async fn resolve_at(
        &self,
        credentials: &SessionCredentials,
        now: DateTime<Utc>,
    ) -> Result<ResolvedSession, SessionError> {
        let session = match self.try_access(credentials.access_token.as_deref()).await? {
            Some(user) => ResolvedSession { user, rotated: None },
            None => match self.try_refresh(credentials.refresh_token.as_deref()).await? {
                RefreshOutcome::Rotated { user, tokens } => ResolvedSession {
                    user,
                    rotated: Some(tokens),
                },
                RefreshOutcome::Missing => return Err(SessionError::Unauthenticated),
                RefreshOutcome::Rejected(failure) => {
                    return Err(SessionError::RefreshRejected(failure));
                }
            },
        };

        check_gates(&session.user, now).map_err(|gate| {
            info!(user_id = %session.user.id, reason = gate.reason(), "Account gate rejected session");
            SessionError::Gate(gate)
        })?;

        Ok(session)
    }
}

/// Apply the account gates in order: banned, inactive, timed out.
pub fn check_gates(user: &User, now: DateTime<Utc>) -> Result<(), GateRejection> {
    match user.status_at(now) {
        AccountStatus::Usable => Ok(()),
        AccountStatus::Banned => Err(GateRejection::Banned),
        AccountStatus::Inactive => Err(GateRejection::Inactive),
        AccountStatus::TimedOut(until) => Err(GateRejection::TimedOut { until }),
    }
}

impl From<GateRejection> for AppError {
    fn from(gate: GateRejection) -> Self {
        AppError::forbidden(gate.to_string()).with_reason(gate.reason())
    }
}
