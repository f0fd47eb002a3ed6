//! Counter store trait backing admission control.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::WindowMode;
use crate::result::AppResult;

/// Outcome of one counted hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    /// Counter value after the increment.
    pub count: i64,
    /// Time until the current window closes.
    pub remaining: Duration,
}

/// Atomic counter-with-expiry backend (Redis or in-process).
///
/// Implementations must perform increment, expiry arming, and read-back as
/// one atomic step so concurrent hits never observe a stale count.
#[async_trait]
pub trait CounterStore: Send + Sync + std::fmt::Debug + 'static {
    /// Increment `key` inside a window of length `window`.
    ///
    /// In [`WindowMode::Fixed`] the expiry is armed only by the hit that
    /// opens the window; in [`WindowMode::Rearm`] every hit pushes it out.
    async fn hit(&self, key: &str, window: Duration, mode: WindowMode) -> AppResult<WindowHit>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
