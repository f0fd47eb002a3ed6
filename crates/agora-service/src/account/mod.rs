//! Account lifecycle: registration, login, activation, and password reset.

pub mod mailer;
pub mod service;

pub use mailer::{Mailer, TracingMailer};
pub use service::{AccountService, LoginOutcome, LoginRequest, RegisterRequest};
