//! Business logic services

pub mod auth_service;
pub mod timesheet_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use timesheet_service::TimesheetService;
pub use user_service::{UserChanges, UserService};
