//! # agora-service
//!
//! Business logic service layer for Agora. Each service orchestrates the
//! store traits and the auth core to implement application use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod account;
pub mod context;
pub mod moderation;

pub use account::{AccountService, LoginOutcome, Mailer, TracingMailer};
pub use context::RequestContext;
pub use moderation::ModerationService;
