//! # agora-cache
//!
//! Counter store implementations for admission control. Supports two modes:
//!
//! - **memory**: in-process windows kept in a [dashmap](https://crates.io/crates/dashmap)
//! - **redis**: Redis-backed windows updated by a Lua script
//!
//! The provider is selected at runtime based on configuration.

#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
