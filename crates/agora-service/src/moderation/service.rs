//! Moderation use cases.
//!
//! Every targeted action loads the target first (missing target is
//! `NotFound`), asks the policy engine once, then mutates.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use agora_auth::policy::{ModerationAction, PolicyEngine};
use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_database::store::{ContentStore, UserStore};
use agora_entity::user::User;

use super::duration::parse_duration;
use crate::context::RequestContext;

/// Timeouts, activation, bans, and content removal.
#[derive(Debug, Clone)]
pub struct ModerationService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Post and comment store.
    content: Arc<dyn ContentStore>,
    /// Permission policy.
    policy: PolicyEngine,
}

impl ModerationService {
    /// Creates a new moderation service.
    pub fn new(users: Arc<dyn UserStore>, content: Arc<dyn ContentStore>) -> Self {
        Self {
            users,
            content,
            policy: PolicyEngine::new(),
        }
    }

    async fn authorize_target(
        &self,
        ctx: &RequestContext,
        target_id: Uuid,
        action: ModerationAction,
    ) -> AppResult<User> {
        let target = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {target_id} not found")))?;

        self.policy.require(ctx.role, target.role_level, action)?;
        Ok(target)
    }

    /// Time out a user for a duration such as `1h` or `15m`.
    pub async fn timeout(&self, ctx: &RequestContext, target_id: Uuid, duration: &str) -> AppResult<User> {
        let target = self
            .authorize_target(ctx, target_id, ModerationAction::Timeout)
            .await?;
        let duration = parse_duration(duration)?;

        let until = Utc::now() + duration;
        let user = self.users.set_timeout(target.id, Some(until)).await?;

        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            target_id = %user.id,
            until = %until,
            "User timed out"
        );
        Ok(user)
    }

    /// Lift an active timeout.
    pub async fn remove_timeout(&self, ctx: &RequestContext, target_id: Uuid) -> AppResult<User> {
        let target = self
            .authorize_target(ctx, target_id, ModerationAction::RemoveTimeout)
            .await?;
        if !target.is_timed_out(Utc::now()) {
            return Err(AppError::conflict("User is not timed out").with_reason("not_timed_out"));
        }

        let user = self.users.set_timeout(target.id, None).await?;
        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            target_id = %user.id,
            "Timeout removed"
        );
        Ok(user)
    }

    /// Users currently timed out, soonest expiry first.
    pub async fn list_timed_out(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        self.policy
            .require_untargeted(ctx.role, ModerationAction::ListTimedOut)?;
        self.users.list_timed_out(Utc::now()).await
    }

    /// Deactivate an account.
    pub async fn deactivate(&self, ctx: &RequestContext, target_id: Uuid) -> AppResult<User> {
        let target = self
            .authorize_target(ctx, target_id, ModerationAction::Deactivate)
            .await?;
        if !target.is_active {
            return Err(AppError::conflict("User is already inactive").with_reason("already_inactive"));
        }

        let user = self.users.set_active(target.id, false).await?;
        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            target_id = %user.id,
            "User deactivated"
        );
        Ok(user)
    }

    /// Reactivate an account.
    pub async fn activate(&self, ctx: &RequestContext, target_id: Uuid) -> AppResult<User> {
        let target = self
            .authorize_target(ctx, target_id, ModerationAction::Activate)
            .await?;
        if target.is_active {
            return Err(AppError::conflict("User is already active").with_reason("already_active"));
        }

        let user = self.users.set_active(target.id, true).await?;
        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            target_id = %user.id,
            "User activated"
        );
        Ok(user)
    }

    /// Ban an account.
    pub async fn ban(&self, ctx: &RequestContext, target_id: Uuid) -> AppResult<User> {
        let target = self
            .authorize_target(ctx, target_id, ModerationAction::Ban)
            .await?;
        if target.banned {
            return Err(AppError::conflict("User is already banned").with_reason("already_banned"));
        }

        let user = self.users.set_banned(target.id, true).await?;
        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            target_id = %user.id,
            "User banned"
        );
        Ok(user)
    }

    /// Lift a ban.
    pub async fn unban(&self, ctx: &RequestContext, target_id: Uuid) -> AppResult<User> {
        let target = self
            .authorize_target(ctx, target_id, ModerationAction::Unban)
            .await?;
        if !target.banned {
            return Err(AppError::conflict("User is not banned").with_reason("not_banned"));
        }

        let user = self.users.set_banned(target.id, false).await?;
        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            target_id = %user.id,
            "User unbanned"
        );
        Ok(user)
    }

    /// Delete any comment.
    pub async fn delete_comment(&self, ctx: &RequestContext, comment_id: Uuid) -> AppResult<()> {
        self.content
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Comment {comment_id} not found")))?;
        self.policy
            .require_untargeted(ctx.role, ModerationAction::DeleteComment)?;

        if !self.content.delete_comment(comment_id).await? {
            return Err(AppError::not_found(format!("Comment {comment_id} not found")));
        }
        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            comment_id = %comment_id,
            "Comment deleted"
        );
        Ok(())
    }

    /// Delete any post along with its comments.
    pub async fn delete_post(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<()> {
        self.content
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;
        self.policy
            .require_untargeted(ctx.role, ModerationAction::DeletePost)?;

        if !self.content.delete_post(post_id).await? {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }
        info!(
            actor_id = %ctx.user_id,
            actor = %ctx.username,
            client_ip = ctx.client_ip(),
            post_id = %post_id,
            "Post deleted"
        );
        Ok(())
    }
}
