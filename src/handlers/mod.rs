//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod timesheets;
pub mod users;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", users::routes())
        .nest("/timesheets", timesheets::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .nest("/auth", auth::routes(state))
        .merge(health::routes())
}
