//! Credential storage for account passwords.
//!
//! Argon2id hashing for registration and reset, plus the length and
//! character-class policy applied before a password is accepted.

pub mod hasher;
pub mod validator;

pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
