//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and endpoint bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use std::net::SocketAddr;
use tracing::warn;

use crate::{
    constants::{rate_limits, API_BASE_PATH},
    error::AppError,
    state::AppState,
};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bucket = path_bucket(request.uri().path());
    let (limit, window) = rate_limit_for(bucket);

    let key = format!("rate_limit:{}:{}", addr.ip(), bucket);
    let mut redis = state.redis();

    // Counting must never take the API down with it
    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Rate limit counter unavailable; allowing request");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        let _: () = redis.expire(&key, window).await.unwrap_or(());
    }

    if count > limit {
        warn!(ip = %addr.ip(), bucket, count, limit, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// `(max requests, window seconds)` for a bucket
fn rate_limit_for(bucket: &str) -> (i64, i64) {
    match bucket {
        "auth" => (rate_limits::AUTH_MAX_REQUESTS, rate_limits::AUTH_WINDOW_SECS),
        "timesheets" => (
            rate_limits::TIMESHEET_MAX_REQUESTS,
            rate_limits::TIMESHEET_WINDOW_SECS,
        ),
        _ => (rate_limits::GENERAL_MAX_REQUESTS, rate_limits::GENERAL_WINDOW_SECS),
    }
}

/// Get bucket for path (for grouping similar endpoints)
pub(crate) fn path_bucket(path: &str) -> &'static str {
    let path = path.strip_prefix(API_BASE_PATH).unwrap_or(path);

    if path.starts_with("/auth/login") || path.starts_with("/auth/refresh") {
        "auth"
    } else if path.starts_with("/timesheets/clock-") {
        "timesheets"
    } else {
        "general"
    }
}
