//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::RoleLevel;

/// A registered member of the platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Role rank.
    #[sqlx(try_from = "i16")]
    pub role_level: RoleLevel,
    /// Free-text role description.
    pub role_description: String,
    /// Whether the account is banned.
    pub banned: bool,
    /// Whether the account has been activated and not deactivated.
    pub is_active: bool,
    /// Account is muted until this time (if set).
    pub timeout_until: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Result of the account-status gates, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// The account may act.
    Usable,
    /// The account is banned.
    Banned,
    /// The account is not activated or was deactivated.
    Inactive,
    /// The account is in a timeout until the given instant.
    TimedOut(DateTime<Utc>),
}

impl User {
    /// Evaluate the account gates at `now`.
    ///
    /// Gates are checked banned → inactive → timeout; the first hit wins.
    pub fn status_at(&self, now: DateTime<Utc>) -> AccountStatus {
        if self.banned {
            return AccountStatus::Banned;
        }
        if !self.is_active {
            return AccountStatus::Inactive;
        }
        match self.timeout_until {
            Some(until) if until > now => AccountStatus::TimedOut(until),
            _ => AccountStatus::Usable,
        }
    }

    /// Whether a timeout is in effect at `now`.
    pub fn is_timed_out(&self, now: DateTime<Utc>) -> bool {
        self.timeout_until.is_some_and(|until| until > now)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role_level: RoleLevel,
    /// Role description.
    pub role_description: String,
    /// Whether the account starts activated.
    pub is_active: bool,
}
