//! Request extractors.

pub mod auth;
pub mod client_ip;
pub mod path;
pub mod validated;

pub use auth::AuthUser;
pub use client_ip::request_client_ip;
pub use path::parse_uuid;
pub use validated::ValidJson;
