//! User domain entities.

pub mod model;
pub mod role;

pub use model::{AccountStatus, NewUser, User};
pub use role::RoleLevel;
