//! Claim set carried by every token class.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::class::TokenClass;

/// JWT payload. The class is implied by the secret that verifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Random token ID so two tokens minted in the same second differ.
    pub jti: Uuid,
}

impl Claims {
    /// Build claims for `subject` issued at `now`.
    pub fn new(class: TokenClass, subject: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            sub: subject,
            exp: (now + class.ttl()).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
