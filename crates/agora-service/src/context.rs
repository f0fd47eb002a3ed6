//! Request context carrying the authenticated actor.

use serde::Serialize;
use uuid::Uuid;

use agora_entity::user::{RoleLevel, User};

/// Context for the current authenticated request.
///
/// Built by the session middleware from the resolved user and passed into
/// service methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username, for audit log fields.
    pub username: String,
    /// The actor's role level as loaded for this request.
    pub role: RoleLevel,
    /// Best-effort client IP address.
    pub ip_address: Option<String>,
}

impl RequestContext {
    /// Creates a context for `user` acting from `ip_address`.
    pub fn new(user: &User, ip_address: Option<String>) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role_level,
            ip_address,
        }
    }

    /// Client IP for log fields, `unknown` when not captured.
    pub fn client_ip(&self) -> &str {
        self.ip_address.as_deref().unwrap_or("unknown")
    }
}
