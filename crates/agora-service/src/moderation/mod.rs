//! Moderation actions gated by the permission policy.

pub mod duration;
pub mod service;

pub use duration::parse_duration;
pub use service::ModerationService;
