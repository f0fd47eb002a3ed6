//! # agora-core
//!
//! Core crate for Agora. Contains configuration schemas, the counter-store
//! trait used by admission control, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Agora crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
