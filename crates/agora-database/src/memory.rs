//! In-process store implementations for tests and local development.
//!
//! Each store keeps its rows behind one async lock, so uniqueness checks
//! and inserts are atomic with respect to each other.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_entity::content::{Comment, Post};
use agora_entity::user::{NewUser, User};

use crate::store::{ContentStore, UserStore};

/// `UserStore` backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a fully-formed user row.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Snapshot of a user row.
    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    async fn update(&self, id: Uuid, apply: impl FnOnce(&mut User)) -> AppResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        apply(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.get(id).await)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, data: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&data.username))
        {
            return Err(
                AppError::conflict(format!("Username '{}' already exists", data.username))
                    .with_reason("username_taken"),
            );
        }
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&data.email)) {
            return Err(AppError::conflict("Email already in use").with_reason("email_taken"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            role_level: data.role_level,
            role_description: data.role_description,
            banned: false,
            is_active: data.is_active,
            timeout_until: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> AppResult<User> {
        self.update(id, |u| u.banned = banned).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<User> {
        self.update(id, |u| u.is_active = active).await
    }

    async fn set_timeout(&self, id: Uuid, until: Option<DateTime<Utc>>) -> AppResult<User> {
        self.update(id, |u| u.timeout_until = until).await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User> {
        self.update(id, |u| u.password_hash = password_hash.to_string())
            .await
    }

    async fn list_timed_out(&self, now: DateTime<Utc>) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut timed_out: Vec<User> = users
            .values()
            .filter(|u| u.is_timed_out(now))
            .cloned()
            .collect();
        timed_out.sort_by_key(|u| u.timeout_until);
        Ok(timed_out)
    }
}

#[derive(Debug, Default)]
struct ContentRows {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// `ContentStore` backed by hash maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    rows: Arc<RwLock<ContentRows>>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post.
    pub async fn insert_post(&self, post: Post) {
        self.rows.write().await.posts.insert(post.id, post);
    }

    /// Insert a comment.
    pub async fn insert_comment(&self, comment: Comment) {
        self.rows.write().await.comments.insert(comment.id, comment);
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find_post(&self, id: Uuid) -> AppResult<Option<Post>> {
        Ok(self.rows.read().await.posts.get(&id).cloned())
    }

    async fn find_comment(&self, id: Uuid) -> AppResult<Option<Comment>> {
        Ok(self.rows.read().await.comments.get(&id).cloned())
    }

    async fn delete_post(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let removed = rows.posts.remove(&id).is_some();
        if removed {
            rows.comments.retain(|_, c| c.post_id != id);
        }
        Ok(removed)
    }

    async fn delete_comment(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.write().await.comments.remove(&id).is_some())
    }
}
