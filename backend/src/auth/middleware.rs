//! Middleware for protecting authenticated routes and handling authorization.
//!
//! `jwt_auth` validates the bearer token and resolves it to a live user;
//! `admin_auth` additionally requires the admin role. Both read their
//! dependencies from request extensions installed on the top-level router.

use crate::auth::service::AuthService;
use crate::cache::SharedCache;
use crate::config::Config;
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// JWT authentication middleware.
///
/// On success the request gains the decoded `Claims` and the resolved
/// `PublicUser` as extensions. A valid signature alone is not enough; the
/// user must still exist and be active.
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let pool = request
        .extensions()
        .get::<SqlitePool>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let cache = request
        .extensions()
        .get::<SharedCache>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let config = request
        .extensions()
        .get::<Config>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let auth_service = AuthService::new(&pool, cache, &config);

    let claims = auth_service
        .jwt_utils()
        .validate_token(token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Tokens outlive account state; recheck the user on every request.
    let user = auth_service
        .validate_user(&claims.sub)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Admin role authorization middleware. Must run after `jwt_auth`.
pub async fn admin_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = request
        .extensions()
        .get::<crate::utils::jwt::Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !claims.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::database::models::{CreateUser, UpdateUser, UserRole};
    use crate::database::test_support::setup_pool;
    use crate::services::user_service::UserService;
    use axum::{Extension, Router, body::Body, http::Request, middleware, routing::get};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "middleware-test-secret".to_string(),
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

    async fn handler() -> &'static str {
        "ok"
    }

    fn test_app(pool: SqlitePool, cache: SharedCache, config: Config) -> Router {
        let admin_routes = Router::new()
            .route("/", get(handler))
            .layer(middleware::from_fn(admin_auth))
            .layer(middleware::from_fn(jwt_auth));

        Router::new()
            .route(
                "/protected",
                get(handler).layer(middleware::from_fn(jwt_auth)),
            )
            .nest("/admin", admin_routes)
            .layer(Extension(pool))
            .layer(Extension(cache))
            .layer(Extension(config))
    }

    async fn seed_user(pool: &SqlitePool, cache: SharedCache, role: UserRole) -> String {
        let username = match role {
            UserRole::Admin => "admin",
            UserRole::User => "reader",
        };
        let user = UserService::new(pool, cache)
            .create_user(
                CreateUser {
                    username: username.to_string(),
                    email: format!("{}@example.com", username),
                    password: "password123".to_string(),
                },
                role,
            )
            .await
            .unwrap();
        user.id
    }

    async fn token_for(pool: &SqlitePool, cache: SharedCache, config: &Config, id: &str) -> String {
        let service = AuthService::new(pool, cache, config);
        let user = service.validate_user(id).await.unwrap();
        service.jwt_utils().generate_access_token(&user).unwrap()
    }

    fn bearer_request(path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_and_malformed_tokens_are_unauthorized() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let app = test_app(pool, cache, test_config());

        let response = app
            .clone()
            .oneshot(bearer_request("/protected", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(bearer_request("/protected", Some("garbage")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn regular_user_passes_jwt_but_not_admin_gate() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let id = seed_user(&pool, Arc::clone(&cache), UserRole::User).await;
        let token = token_for(&pool, Arc::clone(&cache), &config, &id).await;
        let app = test_app(pool, cache, config);

        let response = app
            .clone()
            .oneshot(bearer_request("/protected", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(bearer_request("/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_reaches_admin_routes() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let id = seed_user(&pool, Arc::clone(&cache), UserRole::Admin).await;
        let token = token_for(&pool, Arc::clone(&cache), &config, &id).await;
        let app = test_app(pool, cache, config);

        let response = app
            .oneshot(bearer_request("/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn deactivation_revokes_access_despite_a_valid_token() {
        let pool = setup_pool().await;
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let config = test_config();
        let id = seed_user(&pool, Arc::clone(&cache), UserRole::User).await;
        let token = token_for(&pool, Arc::clone(&cache), &config, &id).await;

        UserService::new(&pool, Arc::clone(&cache))
            .update_user(
                &id,
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

        let app = test_app(pool, cache, config);
        let response = app
            .oneshot(bearer_request("/protected", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
