//! Timekeeper - employee time tracking service
//!
//! User accounts with role-based access, and a clock-in/clock-out ledger that
//! reports worked time per user.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Authorization and business logic
//! - **Ledger**: Clock-in/clock-out rules over a pluggable timesheet store
//! - **Repositories**: Database access
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use ledger::{LedgerError, TimesheetLedger};
pub use state::AppState;
