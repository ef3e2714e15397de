//! User handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{UserChanges, UserService},
    state::AppState,
};

use super::{
    request::{CreateUserRequest, ListUsersQuery, UpdateUserRequest},
    response::{UserResponse, UsersListResponse},
};

/// List all users (paginated, admin only)
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<UsersListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let (users, total) = UserService::list_users(
        state.db(),
        &auth_user,
        page,
        per_page,
        query.search.as_deref(),
    )
    .await?;

    Ok(Json(UsersListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// Create a user (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    payload.validate()?;

    let user = UserService::create_user(
        state.db(),
        &auth_user,
        payload.name.trim(),
        &payload.email,
        &payload.password,
        payload.admin,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a specific user by ID
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::get_visible_user(state.db(), &auth_user, &id).await?;
    Ok(Json(user.into()))
}

/// Update user profile
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;

    let changes = UserChanges {
        name: payload.name.as_deref().map(str::trim),
        email: payload.email.as_deref(),
        password: payload.password.as_deref(),
        admin: payload.admin,
    };

    let user = UserService::update_user(state.db(), &auth_user, &id, changes).await?;
    Ok(Json(user.into()))
}

/// Delete a user (admin only); returns the deleted user
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::delete_user(state.db(), &auth_user, &id).await?;
    Ok(Json(user.into()))
}
