//! Utility functions

pub mod crypto;
pub mod time;
pub mod validation;

pub use crypto::{generate_secure_token, hash_string};
pub use time::format_duration;
pub use validation::{validate_display_name, validate_password};
