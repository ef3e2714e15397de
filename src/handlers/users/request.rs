//! User request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH},
    utils::{validate_display_name, validate_password},
};

/// Create user request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH),
        custom(function = "validate_display_name")
    )]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(
        length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH),
        custom(function = "validate_password")
    )]
    pub password: String,

    #[serde(default)]
    pub admin: bool,
}

/// Update user request; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH),
        custom(function = "validate_display_name")
    )]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(
        length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH),
        custom(function = "validate_password")
    )]
    pub password: Option<String>,

    /// Accepted only when it matches the current role
    pub admin: Option<bool>,
}

/// List users query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}
