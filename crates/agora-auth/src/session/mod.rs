//! Per-request session resolution.

pub mod resolver;

pub use resolver::{
    GateRejection, RefreshFailure, RefreshOutcome, ResolvedSession, SessionCredentials,
    SessionError, SessionResolver, check_gates,
};
