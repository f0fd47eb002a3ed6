//! Counter store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use agora_core::config::{CacheConfig, WindowMode};
use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_core::traits::counter::{CounterStore, WindowHit};

/// Wraps the configured counter store.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CounterStore>,
}

impl CacheManager {
    /// Create a manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CounterStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis counter store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCounterStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory counter store");
                Arc::new(crate::memory::MemoryCounterStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn CounterStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl CounterStore for CacheManager {
    async fn hit(&self, key: &str, window: Duration, mode: WindowMode) -> AppResult<WindowHit> {
        self.inner.hit(key, window, mode).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
