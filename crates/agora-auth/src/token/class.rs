//! Token classes and their fixed lifetimes.

use std::fmt;

use chrono::Duration;

/// The purpose a token was minted for. Each class has its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Proves identity for the current request. Sent as the `access_token` cookie.
    Access,
    /// Mints a new access/refresh pair. Sent as the `refresh_token` cookie.
    Refresh,
    /// Authorizes one password change. Delivered in a reset link.
    PasswordReset,
    /// Activates a newly registered account. Delivered in an activation link.
    Activation,
}

impl TokenClass {
    /// All classes, in key-table order.
    pub const ALL: [TokenClass; 4] = [
        Self::Access,
        Self::Refresh,
        Self::PasswordReset,
        Self::Activation,
    ];

    /// Lifetime in seconds. Also the max-age of the matching cookie.
    pub const fn ttl_seconds(&self) -> i64 {
        match self {
            Self::Access => 30 * 60,
            Self::Refresh => 6 * 60 * 60,
            Self::PasswordReset => 15 * 60,
            Self::Activation => 15 * 60,
        }
    }

    /// Lifetime as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds())
    }

    pub(crate) const fn index(&self) -> usize {
        match self {
            Self::Access => 0,
            Self::Refresh => 1,
            Self::PasswordReset => 2,
            Self::Activation => 3,
        }
    }

    /// Lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
            Self::PasswordReset => "password_reset",
            Self::Activation => "activation",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
