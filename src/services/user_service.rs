//! User service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::BootstrapConfig,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    middleware::AuthenticatedUser,
    models::{role_for, User},
    services::AuthService,
};

/// Fields of a profile update; `None` leaves a field unchanged
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub admin: Option<bool>,
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get a user the requester is allowed to see (themself, or anyone for admins)
    pub async fn get_visible_user(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<User> {
        requester.require_self_or_admin(id)?;
        Self::get_user_by_id(pool, id).await
    }

    /// List users with pagination (admin only)
    pub async fn list_users(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        page: u32,
        per_page: u32,
        search: Option<&str>,
    ) -> AppResult<(Vec<User>, i64)> {
        requester.require_admin()?;

        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let limit = per_page as i64;

        UserRepository::list(pool, offset, limit, search).await
    }

    /// Create a user (admin only)
    pub async fn create_user(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        name: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> AppResult<User> {
        requester.require_admin()?;
        Self::insert_user(pool, name, email, password, admin).await
    }

    /// Update user profile.
    ///
    /// Users may edit their own name, email and password; administrators may
    /// edit anyone's. The role never changes through this path.
    pub async fn update_user(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        target_id: &Uuid,
        changes: UserChanges<'_>,
    ) -> AppResult<User> {
        requester.require_self_or_admin(target_id)?;

        let current = Self::get_user_by_id(pool, target_id).await?;
        if changes.admin.is_some_and(|admin| admin != current.is_admin()) {
            return Err(AppError::Forbidden("Admin status cannot be changed".to_string()));
        }

        if let Some(email) = changes.email {
            if let Some(existing) = UserRepository::find_by_email(pool, email).await? {
                if existing.id != current.id {
                    return Err(AppError::AlreadyExists("Email already registered".to_string()));
                }
            }
        }

        let password_hash = changes.password.map(AuthService::hash_password).transpose()?;

        let user = UserRepository::update(
            pool,
            target_id,
            changes.name,
            changes.email,
            password_hash.as_deref(),
        )
        .await?;

        info!(user_id = %user.id, updated_by = %requester.id, "User updated");
        Ok(user)
    }

    /// Delete a user (admin only). Administrators cannot be deleted.
    pub async fn delete_user(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        target_id: &Uuid,
    ) -> AppResult<User> {
        requester.require_admin()?;

        let user = Self::get_user_by_id(pool, target_id).await?;
        if user.is_admin() {
            return Err(AppError::Forbidden("Unable to delete admin".to_string()));
        }

        let deleted = UserRepository::delete(pool, target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %deleted.id, deleted_by = %requester.id, "User deleted");
        Ok(deleted)
    }

    /// Create the configured first administrator unless that email is taken
    pub async fn ensure_bootstrap_admin(pool: &PgPool, bootstrap: &BootstrapConfig) -> AppResult<Option<User>> {
        let (Some(email), Some(password)) = (&bootstrap.admin_email, &bootstrap.admin_password) else {
            return Ok(None);
        };

        if UserRepository::find_by_email(pool, email).await?.is_some() {
            return Ok(None);
        }

        let user = Self::insert_user(pool, &bootstrap.admin_name, email, password, true).await?;
        info!(user_id = %user.id, email = %user.email, "Bootstrap administrator created");
        Ok(Some(user))
    }

    async fn insert_user(
        pool: &PgPool,
        name: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> AppResult<User> {
        if UserRepository::find_by_email(pool, email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = AuthService::hash_password(password)?;
        let role = role_for(admin);

        let user = UserRepository::create(pool, name, email, &password_hash, role).await?;
        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }
}
