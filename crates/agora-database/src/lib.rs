//! # agora-database
//!
//! PostgreSQL connection management, the store traits the auth core is
//! written against, and their sqlx-backed repository implementations.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ContentStore, UserStore};
