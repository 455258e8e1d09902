//! JWT token utilities for authentication and authorization.
//!
//! Provides signed token creation, validation, and claims management for
//! the access/refresh token pair. Both token kinds carry the same identity
//! claims; they differ only in lifetime.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::cache::REFRESH_TOKEN_TTL_SECONDS;
use crate::config::Config;
use crate::database::models::{PublicUser, UserRole};
use crate::errors::ServiceError;

/// JWT claims structure carrying user identity data
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
    /// Unique token id; keeps two tokens issued in the same second distinct
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the injected configuration.
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            access_expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Generate an access token with the configured expiry.
    pub fn generate_access_token(&self, user: &PublicUser) -> Result<String, ServiceError> {
        self.generate(user, self.access_expires_in_seconds as i64)
    }

    /// Generate a refresh token. The 7-day lifetime is fixed regardless of
    /// the configured access-token expiry.
    pub fn generate_refresh_token(&self, user: &PublicUser) -> Result<String, ServiceError> {
        self.generate(user, REFRESH_TOKEN_TTL_SECONDS as i64)
    }

    fn generate(&self, user: &PublicUser, expires_in_seconds: i64) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_seconds);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: uuid::Uuid::now_v7().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a token. Bad signature and expired tokens both
    /// surface as Unauthorized.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::unauthorized(format!("Token validation failed: {}", e)))
    }

    pub fn access_expires_in_seconds(&self) -> u64 {
        self.access_expires_in_seconds
    }
}
