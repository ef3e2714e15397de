//! Request logging middleware
//!
//! One completion line per request, tagged with the rate-limit bucket and,
//! behind the auth middleware, the caller's user id.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use super::{auth::RequestUser, rate_limit::path_bucket};

/// How a finished request is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    /// Expected client-side refusals: unknown routes and timesheet state
    /// conflicts (clocking in twice, clocking out while not clocked in)
    Refused,
    ClientError,
    ServerError,
}

fn outcome(status: StatusCode, bucket: &str) -> Outcome {
    if status.is_server_error() {
        Outcome::ServerError
    } else if status == StatusCode::NOT_FOUND
        || (bucket == "timesheets" && status == StatusCode::CONFLICT)
    {
        Outcome::Refused
    } else if status.is_client_error() {
        Outcome::ClientError
    } else {
        Outcome::Ok
    }
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let bucket = path_bucket(&path);

    let response = next.run(request).await;

    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);
    let status = response.status().as_u16();
    let user = response
        .extensions()
        .get::<RequestUser>()
        .map(|RequestUser(id)| id.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    match outcome(response.status(), bucket) {
        Outcome::ServerError => warn!(
            %method, %path, bucket, status, %user, %duration_ms,
            "Request completed with server error"
        ),
        Outcome::ClientError => warn!(
            %method, %path, bucket, status, %user, %duration_ms,
            "Request completed with client error"
        ),
        Outcome::Ok | Outcome::Refused => info!(
            %method, %path, bucket, status, %user, %duration_ms,
            "Request completed"
        ),
    }

    response
}
