//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRY_HOURS, DEFAULT_LEDGER_COUNT_OPEN_ENTRIES,
    DEFAULT_LEDGER_MAX_RETRIES, DEFAULT_LEDGER_RETRY_BACKOFF_MS, DEFAULT_LEDGER_STORAGE_TIMEOUT_MS,
    DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub ledger: LedgerConfig,
    pub bootstrap: BootstrapConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
    pub refresh_token_expiry_days: i64,
}

/// Timesheet ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Upper bound on every storage call
    pub storage_timeout_ms: u64,
    /// Retries for transient read failures
    pub max_retries: u32,
    /// Base delay between read retries (doubles per attempt)
    pub retry_backoff_ms: u64,
    /// Count open entries up to "now" when totalling worked time
    pub count_open_entries: bool,
}

/// Optional first administrator, created at startup if missing
#[derive(Debug, Clone, Default)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            ledger: LedgerConfig::from_env()?,
            bootstrap: BootstrapConfig::from_env()?,
        })
    }
}

/// Read an optional variable, falling back to `default` and failing on unparsable input
fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_or("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: parse_or("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            refresh_token_expiry_days: parse_or(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
            )?,
        })
    }
}

impl LedgerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            storage_timeout_ms: parse_or("LEDGER_STORAGE_TIMEOUT_MS", DEFAULT_LEDGER_STORAGE_TIMEOUT_MS)?,
            max_retries: parse_or("LEDGER_MAX_RETRIES", DEFAULT_LEDGER_MAX_RETRIES)?,
            retry_backoff_ms: parse_or("LEDGER_RETRY_BACKOFF_MS", DEFAULT_LEDGER_RETRY_BACKOFF_MS)?,
            count_open_entries: parse_or("LEDGER_COUNT_OPEN_ENTRIES", DEFAULT_LEDGER_COUNT_OPEN_ENTRIES)?,
        };

        if config.storage_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("LEDGER_STORAGE_TIMEOUT_MS".to_string()));
        }

        Ok(config)
    }

    /// Storage timeout as a `Duration`
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }

    /// Base retry backoff as a `Duration`
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_timeout_ms: DEFAULT_LEDGER_STORAGE_TIMEOUT_MS,
            max_retries: DEFAULT_LEDGER_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_LEDGER_RETRY_BACKOFF_MS,
            count_open_entries: DEFAULT_LEDGER_COUNT_OPEN_ENTRIES,
        }
    }
}

impl BootstrapConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let admin_email = env::var("BOOTSTRAP_ADMIN_EMAIL").ok().filter(|s| !s.is_empty());
        let admin_password = env::var("BOOTSTRAP_ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        if admin_email.is_some() && admin_password.is_none() {
            return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD".to_string()));
        }

        Ok(Self {
            admin_email,
            admin_password,
            admin_name: env::var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
