//! Per-client admission control.

pub mod limiter;

pub use limiter::{Admission, RateLimiter};
