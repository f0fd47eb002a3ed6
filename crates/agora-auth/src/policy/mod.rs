//! Moderation permission policy.

pub mod action;
pub mod decision;
pub mod engine;

pub use action::ModerationAction;
pub use decision::{Decision, DenyReason};
pub use engine::PolicyEngine;
