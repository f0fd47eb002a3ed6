//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use agora_auth::password::{PasswordHasher, PasswordValidator};
use agora_auth::session::SessionResolver;
use agora_auth::throttle::RateLimiter;
use agora_auth::token::TokenService;
use agora_cache::CacheManager;
use agora_core::config::AppConfig;
use agora_core::result::AppResult;
use agora_core::traits::counter::CounterStore;
use agora_database::store::{ContentStore, UserStore};
use agora_service::{AccountService, Mailer, ModerationService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Counter store (Redis or in-memory)
    pub counters: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// Token issuing and verification
    pub tokens: Arc<TokenService>,
    /// Cookie session resolution and rotation
    pub sessions: Arc<SessionResolver>,
    /// Per-IP admission control
    pub limiter: Arc<RateLimiter>,

    // ── Services ─────────────────────────────────────────────
    /// Registration, login, activation, password reset
    pub accounts: Arc<AccountService>,
    /// Moderation actions
    pub moderation: Arc<ModerationService>,
}

impl AppState {
    /// Wire the auth core and services over the given stores.
    ///
    /// Fails when the auth configuration is unusable.
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        content: Arc<dyn ContentStore>,
        counters: Arc<CacheManager>,
        mailer: Arc<dyn Mailer>,
    ) -> AppResult<Self> {
        let tokens = Arc::new(TokenService::new(&config.auth)?);
        let sessions = Arc::new(SessionResolver::new(
            Arc::clone(&tokens),
            Arc::clone(&users),
        ));

        let store: Arc<dyn CounterStore> = counters.clone();
        let limiter = Arc::new(RateLimiter::new(store, &config.rate_limit));

        let accounts = Arc::new(AccountService::new(
            Arc::clone(&users),
            Arc::clone(&sessions),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config.auth)),
            mailer,
        ));
        let moderation = Arc::new(ModerationService::new(users, content));

        Ok(Self {
            config: Arc::new(config),
            counters,
            tokens,
            sessions,
            limiter,
            accounts,
            moderation,
        })
    }
}
