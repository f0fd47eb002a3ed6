//! Privileged moderation actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use agora_core::error::AppError;

/// An action gated by the permission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModerationAction {
    /// Mute a user until a deadline.
    Timeout,
    /// Lift a timeout early.
    RemoveTimeout,
    /// List currently timed-out users.
    ListTimedOut,
    /// Deactivate an account.
    Deactivate,
    /// Reactivate an account.
    Activate,
    /// Ban an account.
    Ban,
    /// Lift a ban.
    Unban,
    /// Delete any comment.
    DeleteComment,
    /// Delete any post.
    DeletePost,
}

impl ModerationAction {
    /// Every action, for exhaustive tests.
    pub const ALL: [ModerationAction; 9] = [
        Self::Timeout,
        Self::RemoveTimeout,
        Self::ListTimedOut,
        Self::Deactivate,
        Self::Activate,
        Self::Ban,
        Self::Unban,
        Self::DeleteComment,
        Self::DeletePost,
    ];

    /// Kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RemoveTimeout => "remove-timeout",
            Self::ListTimedOut => "list-timed-out",
            Self::Deactivate => "deactivate",
            Self::Activate => "activate",
            Self::Ban => "ban",
            Self::Unban => "unban",
            Self::DeleteComment => "delete-comment",
            Self::DeletePost => "delete-post",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown moderation action: '{s}'")))
    }
}
