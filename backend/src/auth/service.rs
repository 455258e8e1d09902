//! Core business logic for the authentication system.
//!
//! Issues the access/refresh token pair, rotates refresh tokens, and decides
//! session validity. The session cache holds the single active refresh token
//! per user and is authoritative at refresh time; the `refresh_tokens` table
//! is an audit trail cleared on logout.

use crate::auth::models::{LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse};
use crate::cache::{REFRESH_TOKEN_TTL_SECONDS, SharedCache, refresh_token_key, user_key};
use crate::config::Config;
use crate::database::models::{CreateUser, PublicUser, UserRole};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::refresh_token_repository::RefreshTokenRepository;
use crate::services::user_service::UserService;
use crate::services::validation_messages;
use crate::utils::jwt::JwtUtils;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service for registration, login, and token lifecycle
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    cache: SharedCache,
    jwt_utils: JwtUtils,
    user_service: UserService<'a>,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, cache: SharedCache, config: &Config) -> Self {
        let jwt_utils = JwtUtils::new(config);
        let user_service = UserService::new(pool, cache.clone());

        AuthService {
            pool,
            cache,
            jwt_utils,
            user_service,
        }
    }

    /// Registers a new account with the regular user role. Registration does
    /// not log the user in; the client follows up with a login call.
    pub async fn register(&self, request: CreateUser) -> ServiceResult<PublicUser> {
        self.user_service.create_user(request, UserRole::User).await
    }

    /// Authenticates by email or username and issues the token pair.
    ///
    /// Unknown identifier, wrong password, and deactivated account all
    /// collapse to the same Unauthorized "Invalid credentials" so the
    /// response does not leak which part failed.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        // Email first, then username.
        let user = match self.user_service.find_by_email(&request.identifier).await? {
            Some(user) => Some(user),
            None => {
                self.user_service
                    .find_by_username(&request.identifier)
                    .await?
            }
        };

        let Some(user) = user else {
            return Err(ServiceError::unauthorized("Invalid credentials"));
        };

        if !UserService::verify_password(&request.password, &user.password_hash)? {
            return Err(ServiceError::unauthorized("Invalid credentials"));
        }

        if !user.is_active {
            return Err(ServiceError::unauthorized("Invalid credentials"));
        }

        let public: PublicUser = user.into();
        let (access_token, refresh_token) = self.issue_tokens(&public).await?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: public,
            expires_in: self.jwt_utils.access_expires_in_seconds(),
        })
    }

    /// Rotates the refresh token: the presented token must verify and match
    /// the cached active token for its user, after which a fresh pair is
    /// issued and the old token is dead.
    pub async fn refresh_tokens(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<RefreshTokenResponse> {
        let claims = self.jwt_utils.validate_token(&request.refresh_token)?;

        let active = self.cache.get(&refresh_token_key(&claims.sub)).await;
        if active.as_deref() != Some(request.refresh_token.as_str()) {
            return Err(ServiceError::unauthorized("Invalid refresh token"));
        }

        let user = self.validate_user(&claims.sub).await?;
        let (access_token, refresh_token) = self.issue_tokens(&user).await?;

        Ok(RefreshTokenResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_utils.access_expires_in_seconds(),
        })
    }

    /// Ends every session for the user. Safe to call with no session open.
    pub async fn logout(&self, user_id: &str) -> ServiceResult<()> {
        self.cache.del(&refresh_token_key(user_id)).await;
        self.cache.del(&user_key(user_id)).await;
        RefreshTokenRepository::new(self.pool)
            .delete_by_user(user_id)
            .await?;

        Ok(())
    }

    /// Resolves a token subject to a live user. Deactivated or deleted users
    /// fail here even while their tokens are still cryptographically valid.
    pub async fn validate_user(&self, user_id: &str) -> ServiceResult<PublicUser> {
        let user = self
            .user_service
            .find_public_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Invalid credentials"))?;

        if !user.is_active {
            return Err(ServiceError::unauthorized("Account is deactivated"));
        }

        Ok(user)
    }

    /// Issues a fresh token pair and records the refresh token as the single
    /// active one for the user.
    async fn issue_tokens(&self, user: &PublicUser) -> ServiceResult<(String, String)> {
        let access_token = self.jwt_utils.generate_access_token(user)?;
        let refresh_token = self.jwt_utils.generate_refresh_token(user)?;

        self.cache
            .set(
                &refresh_token_key(&user.id),
                &refresh_token,
                Some(REFRESH_TOKEN_TTL_SECONDS),
            )
            .await;

        let expires_at = Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECONDS as i64);
        RefreshTokenRepository::new(self.pool)
            .create(&refresh_token, &user.id, expires_at)
            .await?;

        Ok((access_token, refresh_token))
    }

    pub fn jwt_utils(&self) -> &JwtUtils {
        &self.jwt_utils
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::database::models::UpdateUser;
    use crate::database::test_support::setup_pool;
    use std::sync::Arc;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "auth-service-test-secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 3000,
            environment: "development".to_string(),
            redis_enabled: false,
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            redis_password: None,
            redis_db: 0,
            allowed_origins: vec![],
            upload_dir: "uploads".to_string(),
        }
    }

    fn register_request() -> CreateUser {
        CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        }
    }

    fn login_request(identifier: &str, password: &str) -> LoginRequest {
        LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, cache, &config);

        let registered = service.register(register_request()).await.unwrap();
        assert_eq!(registered.username, "alice");

        // Login works with the email and with the username.
        let by_email = service
            .login(login_request("alice@example.com", "password123"))
            .await
            .unwrap();
        assert_eq!(by_email.user.id, registered.id);
        assert_eq!(by_email.expires_in, 3600);

        let by_username = service
            .login(login_request("alice", "password123"))
            .await
            .unwrap();
        assert_eq!(by_username.user.id, registered.id);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, cache, &config);

        service.register(register_request()).await.unwrap();
        let result = service.register(register_request()).await;
        assert!(matches!(result, Err(ServiceError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn login_token_claims_match_the_user() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, cache, &config);

        let user = service.register(register_request()).await.unwrap();
        let login = service
            .login(login_request("alice", "password123"))
            .await
            .unwrap();

        let claims = service.jwt_utils().validate_token(&login.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "alice@example.com");
        assert!(!claims.is_admin());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_identifier_are_indistinguishable() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, cache, &config);

        service.register(register_request()).await.unwrap();

        let wrong_password = service
            .login(login_request("alice", "not-the-password"))
            .await
            .unwrap_err();
        let unknown_user = service
            .login(login_request("nobody", "password123"))
            .await
            .unwrap_err();

        let ServiceError::Unauthorized { message: a } = wrong_password else {
            panic!("expected Unauthorized");
        };
        let ServiceError::Unauthorized { message: b } = unknown_user else {
            panic!("expected Unauthorized");
        };
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn refresh_rotation_invalidates_the_prior_token() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, cache, &config);

        service.register(register_request()).await.unwrap();
        let login = service
            .login(login_request("alice", "password123"))
            .await
            .unwrap();

        let rotated = service
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: login.refresh_token.clone(),
            })
            .await
            .unwrap();
        assert_ne!(rotated.refresh_token, login.refresh_token);

        // The superseded token still verifies cryptographically but is no
        // longer the cached active token.
        let replay = service
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await;
        assert!(matches!(replay, Err(ServiceError::Unauthorized { .. })));

        // The rotated token keeps working.
        service
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: rotated.refresh_token,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn logout_invalidates_the_last_refresh_token() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, cache, &config);

        let user = service.register(register_request()).await.unwrap();
        let login = service
            .login(login_request("alice", "password123"))
            .await
            .unwrap();

        service.logout(&user.id).await.unwrap();

        let result = service
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Unauthorized { .. })));

        // Persistent rows are gone too, and logout stays idempotent.
        let rows = RefreshTokenRepository::new(&pool)
            .count_for_user(&user.id)
            .await
            .unwrap();
        assert_eq!(rows, 0);
        service.logout(&user.id).await.unwrap();
    }

    #[tokio::test]
    async fn deactivated_user_fails_validation() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, Arc::clone(&cache), &config);

        let user = service.register(register_request()).await.unwrap();
        service.validate_user(&user.id).await.unwrap();

        UserService::new(&pool, cache)
            .update_user(
                &user.id,
                UpdateUser {
                    email: None,
                    username: None,
                    role: None,
                    is_active: Some(false),
                    password: None,
                },
            )
            .await
            .unwrap();

        let result = service.validate_user(&user.id).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized { .. })));

        // A deactivated account can no longer log in either.
        let login = service.login(login_request("alice", "password123")).await;
        assert!(matches!(login, Err(ServiceError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn garbage_refresh_token_is_rejected() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let service = AuthService::new(&pool, cache, &config);

        let result = service
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: "not-a-token".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Unauthorized { .. })));
    }
}
