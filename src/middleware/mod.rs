//! HTTP middleware
//!
//! `auth` is a route layer on the protected routes only. `rate_limit` and
//! `logging` wrap the whole API; logging sits outermost so it also records
//! rate-limited requests.

pub mod auth;
pub mod logging;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthenticatedUser, RequestUser};
pub use logging::logging_middleware;
pub use rate_limit::rate_limit_middleware;
