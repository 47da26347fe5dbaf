//! Request middleware and extractors.

pub mod auth;
pub mod caller;

pub use auth::{AuthUser, auth_middleware};
pub use caller::Caller;
