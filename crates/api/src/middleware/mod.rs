//! Authentication and authorization middleware.

pub mod auth;

pub use auth::{auth_middleware, check_scope, AuthUser};
