//! Store traits the auth core and services depend on.
//!
//! Components take these as constructor parameters (`Arc<dyn UserStore>`)
//! so no code reaches for a process-wide database handle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use agora_core::result::AppResult;
use agora_entity::content::{Comment, Post};
use agora_entity::user::{NewUser, User};

/// Identity lookup and moderation mutations.
///
/// Mutations return the updated user and fail with `NotFound` when the
/// id does not exist.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user. Duplicate username/email fails with `Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Set or clear the banned flag.
    async fn set_banned(&self, id: Uuid, banned: bool) -> AppResult<User>;

    /// Set or clear the active flag.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<User>;

    /// Set or clear the timeout.
    async fn set_timeout(&self, id: Uuid, until: Option<DateTime<Utc>>) -> AppResult<User>;

    /// Replace the password hash.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User>;

    /// Users whose timeout ends after `now`, soonest first.
    async fn list_timed_out(&self, now: DateTime<Utc>) -> AppResult<Vec<User>>;
}

/// Post and comment existence checks and deletion.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a post by id.
    async fn find_post(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// Find a comment by id.
    async fn find_comment(&self, id: Uuid) -> AppResult<Option<Comment>>;

    /// Delete a post (and its comments). Returns `true` if a row was removed.
    async fn delete_post(&self, id: Uuid) -> AppResult<bool>;

    /// Delete a comment. Returns `true` if a row was removed.
    async fn delete_comment(&self, id: Uuid) -> AppResult<bool>;
}
