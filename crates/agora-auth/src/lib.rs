//! # agora-auth
//!
//! The session authentication and authorization core for Agora.
//!
//! ## Modules
//!
//! - `token`: signed, time-boxed tokens for the four token classes
//! - `session`: per-request session resolution with refresh rotation
//! - `policy`: the moderation permission matrix
//! - `throttle`: per-client admission control over a counter store
//! - `password`: Argon2id hashing and password policy

pub mod password;
pub mod policy;
pub mod session;
pub mod throttle;
pub mod token;

pub use password::{PasswordHasher, PasswordValidator};
pub use policy::{Decision, DenyReason, ModerationAction, PolicyEngine};
pub use session::{GateRejection, ResolvedSession, SessionCredentials, SessionError, SessionResolver};
pub use throttle::{Admission, RateLimiter};
pub use token::{Claims, TokenClass, TokenError, TokenPair, TokenService};
