//! Input validation utilities
//!
//! Custom checks plugged into `validator` derives on request DTOs.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Printable names: at least one visible character, no control characters
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\p{Cc}]*\S[^\p{Cc}]*$").expect("name pattern is valid"));

/// Validate a display name
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("display_name")
            .with_message("Name must contain visible characters and no control characters".into()))
    }
}

/// Validate that a password is not only whitespace
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::new("password").with_message("Password cannot be blank".into()));
    }
    Ok(())
}
