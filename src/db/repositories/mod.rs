//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod timesheet_repo;
pub mod user_repo;

pub use timesheet_repo::{PgTimesheetStore, TimesheetRepository};
pub use user_repo::UserRepository;
