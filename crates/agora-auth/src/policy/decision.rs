//! Policy decision values.

use std::fmt;

use serde::{Deserialize, Serialize};

use agora_core::error::AppError;
use agora_core::result::AppResult;

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenyReason {
    /// The actor is below the action's minimum level.
    InsufficientPermissions,
    /// A moderator targeted another moderator.
    ModeratorCannotActOnPeer,
    /// A moderator targeted an admin.
    ModeratorCannotActOnAdmin,
    /// An admin targeted another admin.
    AdminCannotActOnAdmin,
}

impl DenyReason {
    /// Snake-case reason sent to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientPermissions => "insufficient_permissions",
            Self::ModeratorCannotActOnPeer => "moderator_cannot_act_on_peer",
            Self::ModeratorCannotActOnAdmin => "moderator_cannot_act_on_admin",
            Self::AdminCannotActOnAdmin => "admin_cannot_act_on_admin",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::InsufficientPermissions => "insufficient permissions",
            Self::ModeratorCannotActOnPeer => "moderators cannot act on other moderators",
            Self::ModeratorCannotActOnAdmin => "moderators cannot act on administrators",
            Self::AdminCannotActOnAdmin => "administrators cannot act on other administrators",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a policy evaluation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the action may proceed.
    pub allow: bool,
    /// Set exactly when `allow` is false.
    pub reason: Option<DenyReason>,
}

impl Decision {
    /// An allowing decision.
    pub const fn allow() -> Self {
        Self {
            allow: true,
            reason: None,
        }
    }

    /// A denying decision.
    pub const fn deny(reason: DenyReason) -> Self {
        Self {
            allow: false,
            reason: Some(reason),
        }
    }

    /// Convert into a `Forbidden` error carrying the deny reason.
    pub fn into_result(self) -> AppResult<()> {
        match self.reason {
            Some(reason) if !self.allow => {
                Err(AppError::forbidden(reason.message()).with_reason(reason.as_str()))
            }
            _ => Ok(()),
        }
    }
}
