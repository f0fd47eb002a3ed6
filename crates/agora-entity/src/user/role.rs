//! Role hierarchy levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use agora_core::AppError;

/// Integer rank used for permission comparisons.
///
/// Stored as a `SMALLINT` and serialized as its numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum RoleLevel {
    /// Regular member.
    Normal = 1,
    /// Can moderate normal members and delete comments.
    Moderator = 2,
    /// Full moderation rights.
    Admin = 3,
}

impl RoleLevel {
    /// Return the numeric level.
    pub fn level(&self) -> i16 {
        *self as i16
    }

    /// Default free-text description stored alongside the level.
    pub fn default_description(&self) -> &'static str {
        match self {
            Self::Normal => "normal user",
            Self::Moderator => "moderator",
            Self::Admin => "administrator",
        }
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl From<RoleLevel> for i16 {
    fn from(role: RoleLevel) -> Self {
        role.level()
    }
}

impl TryFrom<i16> for RoleLevel {
    type Error = AppError;

    fn try_from(level: i16) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Normal),
            2 => Ok(Self::Moderator),
            3 => Ok(Self::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid role level: {level}. Expected 1, 2 or 3"
            ))),
        }
    }
}

impl fmt::Display for RoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "1" => Ok(Self::Normal),
            "moderator" | "2" => Ok(Self::Moderator),
            "admin" | "3" => Ok(Self::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: normal, moderator, admin"
            ))),
        }
    }
}
