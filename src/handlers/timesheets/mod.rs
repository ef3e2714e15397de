//! Timesheet handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Timesheet routes (all authenticated)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clock-in", post(handler::clock_in))
        .route("/clock-out", post(handler::clock_out))
        .route("/total", get(handler::my_total))
        .route("/entries", get(handler::my_entries))
        .route("/users/{id}/total", get(handler::user_total))
        .route("/users/{id}/entries", get(handler::user_entries))
}
