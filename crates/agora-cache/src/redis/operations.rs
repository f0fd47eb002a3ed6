//! Redis counter windows driven by a Lua script.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use agora_core::config::WindowMode;
use agora_core::error::{AppError, ErrorKind};
use agora_core::result::AppResult;
use agora_core::traits::counter::{CounterStore, WindowHit};

use super::client::RedisClient;

/// Atomic increment + expiry + read-back.
///
/// KEYS[1] = counter key
/// ARGV[1] = window in milliseconds
/// ARGV[2] = "1" to re-arm the expiry on every hit, "0" for a fixed window
///
/// Returns `{count, remaining_ms}`. A key left without an expiry (PTTL -1)
/// is re-armed so it cannot throttle forever.
const HIT_SCRIPT: &str = r#"
    local count = redis.call('INCR', KEYS[1])
    local ttl = redis.call('PTTL', KEYS[1])
    if count == 1 or ttl < 0 or ARGV[2] == '1' then
        redis.call('PEXPIRE', KEYS[1], ARGV[1])
        ttl = tonumber(ARGV[1])
    end
    return {count, ttl}
"#;

/// Redis-backed counter store for multi-node deployments.
#[derive(Debug, Clone)]
pub struct RedisCounterStore {
    client: RedisClient,
    script: redis::Script,
}

impl RedisCounterStore {
    /// Create a counter store over an established client.
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            script: redis::Script::new(HIT_SCRIPT),
        }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn hit(&self, key: &str, window: Duration, mode: WindowMode) -> AppResult<WindowHit> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let rearm = if mode == WindowMode::Rearm { "1" } else { "0" };

        let (count, remaining_ms): (i64, i64) = self
            .script
            .key(&full_key)
            .arg(window.as_millis() as u64)
            .arg(rearm)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        debug!(key = %full_key, count, remaining_ms, "Counter window hit");

        Ok(WindowHit {
            count,
            remaining: Duration::from_millis(remaining_ms.max(0) as u64),
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
