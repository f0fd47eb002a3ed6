//! Shared test helpers for integration tests.
//!
//! The app runs over the in-memory user, content and counter stores, so
//! no database or Redis is needed.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use agora_api::{AppState, build_app};
use agora_auth::password::PasswordHasher;
use agora_auth::token::{TokenClass, TokenPair};
use agora_cache::CacheManager;
use agora_cache::memory::MemoryCounterStore;
use agora_core::config::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, LoggingConfig, RateLimitConfig,
    ServerConfig,
};
use agora_core::result::AppResult;
use agora_database::memory::{MemoryContentStore, MemoryUserStore};
use agora_entity::content::{Comment, Post};
use agora_entity::user::{RoleLevel, User};
use agora_service::Mailer;

/// Configuration with in-memory stores and distinct test secrets.
pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused/agora".into(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        cache: CacheConfig::default(),
        auth: AuthConfig {
            access_secret: "test-access-secret".into(),
            refresh_secret: "test-refresh-secret".into(),
            reset_secret: "test-reset-secret".into(),
            activation_secret: "test-activation-secret".into(),
            password_min_length: 8,
            secure_cookies: true,
        },
        rate_limit: RateLimitConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// A mail the app tried to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMail {
    /// Activation link token.
    Activation { user_id: Uuid, token: String },
    /// Password reset link token.
    PasswordReset { user_id: Uuid, token: String },
}

/// Mailer that records every message.
#[derive(Debug, Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl CapturingMailer {
    /// All mails sent so far.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Token of the most recent activation mail.
    pub fn last_activation_token(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|m| match m {
            SentMail::Activation { token, .. } => Some(token),
            SentMail::PasswordReset { .. } => None,
        })
    }

    /// Token of the most recent reset mail.
    pub fn last_reset_token(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|m| match m {
            SentMail::PasswordReset { token, .. } => Some(token),
            SentMail::Activation { .. } => None,
        })
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_activation(&self, user: &User, token: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentMail::Activation {
            user_id: user.id,
            token: token.to_string(),
        });
        Ok(())
    }

    async fn send_password_reset(&self, user: &User, token: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentMail::PasswordReset {
            user_id: user.id,
            token: token.to_string(),
        });
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Shared state, for minting tokens directly
    pub state: AppState,
    /// Backing user rows
    pub users: MemoryUserStore,
    /// Backing posts and comments
    pub content: MemoryContentStore,
    /// Captured outbound mail
    pub mailer: Arc<CapturingMailer>,
}

impl TestApp {
    /// Create a test application with the default test configuration
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let users = MemoryUserStore::new();
        let content = MemoryContentStore::new();
        let mailer = Arc::new(CapturingMailer::default());
        let counters = Arc::new(CacheManager::from_store(Arc::new(MemoryCounterStore::new())));

        let state = AppState::new(
            config,
            Arc::new(users.clone()),
            Arc::new(content.clone()),
            counters,
            mailer.clone(),
        )
        .expect("Failed to build app state");

        Self {
            router: build_app(state.clone()),
            state,
            users,
            content,
            mailer,
        }
    }

    /// Insert an active user with an unusable password hash
    pub async fn create_user(&self, username: &str, role: RoleLevel) -> User {
        self.insert_user(username, "not-a-hash".into(), role).await
    }

    /// Insert an active user whose password hashes to `password`
    pub async fn create_user_with_password(
        &self,
        username: &str,
        password: &str,
        role: RoleLevel,
    ) -> User {
        let hash = PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash password");
        self.insert_user(username, hash, role).await
    }

    async fn insert_user(&self, username: &str, password_hash: String, role: RoleLevel) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash,
            role_level: role,
            role_description: role.default_description().to_string(),
            banned: false,
            is_active: true,
            timeout_until: None,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.clone()).await;
        user
    }

    /// Apply a change to a stored user row
    pub async fn update_user(&self, id: Uuid, apply: impl FnOnce(&mut User)) {
        let mut user = self.users.get(id).await.expect("User not found");
        apply(&mut user);
        self.users.insert(user).await;
    }

    /// Insert a post by `author`
    pub async fn create_post(&self, author: Uuid) -> Post {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id: author,
            body: "hello".into(),
            created_at: now,
            updated_at: now,
        };
        self.content.insert_post(post.clone()).await;
        post
    }

    /// Insert a comment on `post`
    pub async fn create_comment(&self, post: Uuid, author: Uuid) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: post,
            author_id: author,
            body: "first".into(),
            created_at: Utc::now(),
        };
        self.content.insert_comment(comment.clone()).await;
        comment
    }

    /// Mint a fresh token pair for a user
    pub fn tokens_for(&self, user_id: Uuid) -> TokenPair {
        self.state
            .tokens
            .issue_pair(user_id)
            .expect("Failed to issue tokens")
    }

    /// `Cookie` header value carrying both session tokens
    pub fn session_cookies(&self, user_id: Uuid) -> String {
        let pair = self.tokens_for(user_id);
        format!(
            "access_token={}; refresh_token={}",
            pair.access_token, pair.refresh_token
        )
    }

    /// `Cookie` header value carrying only a refresh token
    pub fn refresh_cookie(&self, user_id: Uuid) -> String {
        let token = self
            .state
            .tokens
            .issue(TokenClass::Refresh, user_id)
            .expect("Failed to issue token");
        format!("refresh_token={token}")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookies: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(cookies) = cookies {
            req = req.header(COOKIE, cookies);
        }
        let body = match body {
            Some(b) => {
                req = req.header(CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&b).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        self.send(req.body(body).expect("Failed to build request"))
            .await
    }

    /// Make a bodiless request that appears to come from `ip`
    pub async fn request_from(&self, ip: &str, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Machine-readable reason of an error body
    pub fn reason(&self) -> &str {
        self.body["reason"].as_str().unwrap_or_default()
    }

    /// Raw `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    /// Raw `Set-Cookie` header for `name`
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }

    /// Value written for cookie `name`
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.set_cookie(name).map(|c| {
            c[name.len() + 1..]
                .split(';')
                .next()
                .unwrap_or_default()
                .to_string()
        })
    }

    /// `Cookie` header replaying every cookie this response set
    pub fn cookie_header(&self) -> String {
        self.set_cookies()
            .iter()
            .map(|c| c.split(';').next().unwrap_or_default().to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
