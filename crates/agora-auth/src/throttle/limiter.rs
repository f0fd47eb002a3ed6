//! Fixed-window request limiter over a [`CounterStore`].
//!
//! One counter per client IP (`rl:ip:<ip>`). The increment, expiry, and
//! TTL read-back happen in a single atomic store operation, so concurrent
//! requests never observe a stale count.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use agora_core::config::{RateLimitConfig, WindowMode};
use agora_core::result::AppResult;
use agora_core::traits::counter::CounterStore;

/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed.
    Admit {
        /// Requests left in the current window.
        remaining: u64,
    },
    /// The client is over budget.
    Reject {
        /// Whole seconds until the window closes, at least one.
        retry_after: u64,
    },
}

/// Admits at most `limit` requests per client per window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    limit: u64,
    window: Duration,
    mode: WindowMode,
    enabled: bool,
}

impl RateLimiter {
    /// Creates a limiter from configuration.
    pub fn new(store: Arc<dyn CounterStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            limit: u64::from(config.limit),
            window: Duration::from_secs(config.window_seconds),
            mode: config.window_mode,
            enabled: config.enabled,
        }
    }

    /// Whether admission control is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Count one request from `client_ip` and decide whether to admit it.
    ///
    /// A store failure is returned as an error; the caller must not admit.
    pub async fn check(&self, client_ip: &str) -> AppResult<Admission> {
        if !self.enabled {
            return Ok(Admission::Admit {
                remaining: self.limit,
            });
        }

        let key = rate_limit_key(client_ip);
        let hit = self
            .store
            .hit(&key, self.window, self.mode)
            .await
            .inspect_err(|e| error!(key = %key, error = %e, "Rate limit counter unavailable"))?;

        let count = hit.count.max(0) as u64;
        if count > self.limit {
            let retry_after = hit.remaining.as_millis().div_ceil(1000).max(1) as u64;
            warn!(client_ip, count, limit = self.limit, retry_after, "Rate limit exceeded");
            return Ok(Admission::Reject { retry_after });
        }

        Ok(Admission::Admit {
            remaining: self.limit - count,
        })
    }
}

/// Counter key for a client IP.
pub fn rate_limit_key(client_ip: &str) -> String {
    format!("rl:ip:{client_ip}")
}
