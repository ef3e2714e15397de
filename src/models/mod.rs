//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod timesheet;
pub mod user;

pub use timesheet::*;
pub use user::*;
