//! Timesheet handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::TimesheetService,
    state::AppState,
};

use super::{
    request::WindowQuery,
    response::{ClockInResponse, ClockOutResponse, EntriesResponse, TotalResponse},
};

/// Clock the caller in
pub async fn clock_in(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<(StatusCode, Json<ClockInResponse>)> {
    let entry = TimesheetService::clock_in(state.ledger(), &auth_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(ClockInResponse {
            entry_id: entry.id,
            clock_in: entry.clock_in,
        }),
    ))
}

/// Clock the caller out
pub async fn clock_out(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ClockOutResponse>> {
    let entry = TimesheetService::clock_out(state.ledger(), &auth_user).await?;
    Ok(Json(entry.into()))
}

/// Caller's worked time
pub async fn my_total(
    state: State<AppState>,
    auth_user: AuthenticatedUser,
    query: Query<WindowQuery>,
) -> AppResult<Json<TotalResponse>> {
    let id = auth_user.id;
    total_for(state, auth_user, id, query).await
}

/// Caller's entries
pub async fn my_entries(
    state: State<AppState>,
    auth_user: AuthenticatedUser,
    query: Query<WindowQuery>,
) -> AppResult<Json<EntriesResponse>> {
    let id = auth_user.id;
    entries_for(state, auth_user, id, query).await
}

/// Worked time of a given user (admin or owner)
pub async fn user_total(
    state: State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    query: Query<WindowQuery>,
) -> AppResult<Json<TotalResponse>> {
    total_for(state, auth_user, id, query).await
}

/// Entries of a given user (admin or owner)
pub async fn user_entries(
    state: State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    query: Query<WindowQuery>,
) -> AppResult<Json<EntriesResponse>> {
    entries_for(state, auth_user, id, query).await
}

async fn total_for(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    user_id: Uuid,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<TotalResponse>> {
    let range = query.into_range()?;

    let worked =
        TimesheetService::total_worked(state.db(), state.ledger(), &auth_user, &user_id, range).await?;

    Ok(Json(TotalResponse::new(user_id, range.from, range.to, worked)))
}

async fn entries_for(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    user_id: Uuid,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<EntriesResponse>> {
    let range = query.into_range()?;

    let entries =
        TimesheetService::entries(state.db(), state.ledger(), &auth_user, &user_id, range).await?;

    Ok(Json(EntriesResponse {
        user_id,
        total: entries.len(),
        entries: entries.into_iter().map(Into::into).collect(),
    }))
}
