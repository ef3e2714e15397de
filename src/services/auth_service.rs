//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::{Config, JwtConfig},
    constants::REFRESH_TOKEN_LENGTH,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
    utils::{generate_secure_token, hash_string},
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        email: &str,
        password: &str,
    ) -> AppResult<(User, String, String, i64)> {
        let user = UserRepository::find_by_email(pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let (access_token, expires_in) = Self::generate_access_token(&user, &config.jwt)?;
        let refresh_token = generate_secure_token(REFRESH_TOKEN_LENGTH);

        let key = refresh_key(&user.id, &refresh_token);
        redis
            .set_ex::<_, _, ()>(&key, "1", refresh_ttl_secs(&config.jwt))
            .await?;

        info!(user_id = %user.id, "User logged in");
        Ok((user, access_token, refresh_token, expires_in))
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        refresh_token: &str,
    ) -> AppResult<(String, String, i64)> {
        // Find the refresh token in Redis (check all users)
        let pattern = format!("refresh_token:*:{}", hash_string(refresh_token));
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut redis)
            .await?;

        let Some(key) = keys.first() else {
            return Err(AppError::InvalidToken);
        };

        let user_id = key
            .split(':')
            .nth(1)
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or(AppError::InvalidToken)?;

        // Single-use: losing the race to delete means someone else redeemed it
        let removed: i64 = redis.del(key).await?;
        if removed == 0 {
            return Err(AppError::InvalidToken);
        }

        let user = UserRepository::find_by_id(pool, &user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let (access_token, expires_in) = Self::generate_access_token(&user, &config.jwt)?;
        let new_refresh_token = generate_secure_token(REFRESH_TOKEN_LENGTH);

        let new_key = refresh_key(&user.id, &new_refresh_token);
        redis
            .set_ex::<_, _, ()>(&new_key, "1", refresh_ttl_secs(&config.jwt))
            .await?;

        Ok((access_token, new_refresh_token, expires_in))
    }

    /// Logout: drop one refresh token, or every token of the user
    pub async fn logout(
        mut redis: ConnectionManager,
        user_id: &Uuid,
        refresh_token: Option<&str>,
        all_sessions: bool,
    ) -> AppResult<()> {
        if all_sessions {
            let pattern = format!("refresh_token:{}:*", user_id);
            let keys: Vec<String> = redis::cmd("KEYS")
                .arg(&pattern)
                .query_async(&mut redis)
                .await?;

            for key in keys {
                redis.del::<_, ()>(&key).await?;
            }
        } else if let Some(token) = refresh_token {
            redis.del::<_, ()>(refresh_key(user_id, token)).await?;
        }

        Ok(())
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, user_id: &Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(pool, user_id).await
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate access token
    pub fn generate_access_token(user: &User, jwt: &JwtConfig) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(jwt.expiry_hours);
        let expires_in = jwt.expiry_hours * 3600;

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            role: user.role.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expires_in))
    }
}

/// Redis key of a refresh token. Only the token's hash is stored.
fn refresh_key(user_id: &Uuid, token: &str) -> String {
    format!("refresh_token:{}:{}", user_id, hash_string(token))
}

fn refresh_ttl_secs(jwt: &JwtConfig) -> u64 {
    (jwt.refresh_token_expiry_days * 24 * 60 * 60).max(0) as u64
}
