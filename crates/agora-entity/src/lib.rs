//! # agora-entity
//!
//! Domain entity models for Agora. Database entities derive
//! `sqlx::FromRow` alongside `Serialize`/`Deserialize`.

pub mod content;
pub mod user;
