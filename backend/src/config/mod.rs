//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token signing secret, and cache connection
//! details. Configuration is loaded once at startup and injected into the
//! components that need it.

use anyhow::{Context, Result, bail};
use std::env;

/// Minimum signing secret length enforced in production.
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub server_port: u16,
    pub environment: String,
    pub redis_enabled: bool,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    pub redis_db: u32,
    pub allowed_origins: Vec<String>,
    pub upload_dir: String,
}

impl Config {
    /// Loads configuration from environment variables and validates it.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        // Access tokens default to 7 days; refresh tokens are always 7 days.
        let jwt_expires_in_seconds = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let redis_enabled = env::var("REDIS_ENABLED")
            .map(|v| v != "false")
            .unwrap_or(true);

        let redis_host = env::var("REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let redis_port = env::var("REDIS_PORT")
            .unwrap_or_else(|_| "6379".to_string())
            .parse::<u16>()
            .context("REDIS_PORT must be a valid number")?;

        let redis_password = env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty());

        let redis_db = env::var("REDIS_DB")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<u32>()
            .context("REDIS_DB must be a valid number")?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:5173".to_string(),
                    "http://localhost:5174".to_string(),
                ]
            });

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        let config = Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            server_port,
            environment,
            redis_enabled,
            redis_host,
            redis_port,
            redis_password,
            redis_db,
            allowed_origins,
            upload_dir,
        };
        config.validate()?;

        Ok(config)
    }

    /// Fails fast on configuration that must not reach a running server.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        if self.is_production() && self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            bail!(
                "JWT_SECRET must be at least {} characters in production",
                MIN_PRODUCTION_SECRET_LEN
            );
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Connection URL for the cache service.
    pub fn redis_url(&self) -> String {
        match &self.redis_password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.redis_host, self.redis_port, self.redis_db
            ),
            None => format!(
                "redis://{}:{}/{}",
                self.redis_host, self.redis_port, self.redis_db
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 3,
            jwt_secret: "short".to_string(),
            jwt_expires_in_seconds: 604_800,
            server_port: 3000,
            environment: "development".to_string(),
            redis_enabled: true,
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            redis_password: None,
            redis_db: 0,
            allowed_origins: vec![],
            upload_dir: "uploads".to_string(),
        }
    }

    #[test]
    fn short_secret_is_allowed_outside_production() {
        let config = base_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn short_secret_is_rejected_in_production() {
        let mut config = base_config();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn long_secret_passes_production_validation() {
        let mut config = base_config();
        config.environment = "production".to_string();
        config.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_secret_is_always_rejected() {
        let mut config = base_config();
        config.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn redis_url_includes_password_when_set() {
        let mut config = base_config();
        config.redis_password = Some("hunter2".to_string());
        assert_eq!(config.redis_url(), "redis://:hunter2@127.0.0.1:6379/0");

        config.redis_password = None;
        assert_eq!(config.redis_url(), "redis://127.0.0.1:6379/0");
    }
}
