//! Signed session tokens: classes, claims, and the issuing/verifying service.

pub mod claims;
pub mod class;
pub mod service;

pub use claims::Claims;
pub use class::TokenClass;
pub use service::{TokenError, TokenPair, TokenService};
