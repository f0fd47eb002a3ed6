//! In-memory counter windows using dashmap.
//!
//! Each key's entry is locked for the duration of one hit, which makes the
//! increment, expiry arming, and read-back atomic on a single node.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use agora_core::config::WindowMode;
use agora_core::result::AppResult;
use agora_core::traits::counter::{CounterStore, WindowHit};

/// Sweep expired windows every this many hits.
const PURGE_EVERY: u64 = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: i64,
    expires_at: Instant,
}

/// Single-node counter store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterStore {
    windows: Arc<DashMap<String, Window>>,
    hits: Arc<AtomicU64>,
}

impl MemoryCounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every window that has already closed.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows.retain(|_, w| w.expires_at > now);
        debug!(removed = before - self.windows.len(), "Purged expired counter windows");
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn hit(&self, key: &str, window: Duration, mode: WindowMode) -> AppResult<WindowHit> {
        if self.hits.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            self.purge_expired();
        }

        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            expires_at: now + window,
        });

        if entry.expires_at <= now {
            entry.count = 0;
            entry.expires_at = now + window;
        }

        entry.count += 1;
        if mode == WindowMode::Rearm {
            entry.expires_at = now + window;
        }

        Ok(WindowHit {
            count: entry.count,
            remaining: entry.expires_at.saturating_duration_since(now),
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
