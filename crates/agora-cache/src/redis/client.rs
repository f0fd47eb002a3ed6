//! Redis connection management.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use agora_core::config::{RedisCacheConfig, redact_url};
use agora_core::error::{AppError, ErrorKind};
use agora_core::result::AppResult;

/// Redis client wrapper with a reconnecting, multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl RedisClient {
    /// Connect using the given configuration.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %redact_url(&config.url), "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to create Redis client", e)
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e)
        })?;

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Clone of the connection manager; clones share the underlying connection.
    pub fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Build a full key with the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        prefixed_key(&self.key_prefix, key)
    }
}

/// `key` under `prefix`; an empty prefix leaves the key untouched.
pub fn prefixed_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}
