//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse incoming request payloads and defer to
//! `auth::service` for the actual login, registration, and token logic.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::{ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse};
use crate::auth::service::AuthService;
use crate::cache::SharedCache;
use crate::config::Config;
use crate::database::models::{CreateUser, PublicUser};
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle account registration
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Extension(config): Extension<Config>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<PublicUser>>), (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, cache, &config);

    match auth_service.register(payload).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(user, "Account created successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Extension(config): Extension<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<LoginResponse>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, cache, &config);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Login successful",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Extension(config): Extension<Config>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<ApiResponse<RefreshTokenResponse>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, cache, &config);

    match auth_service.refresh_tokens(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Token refreshed",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request: drops every server-side session for the caller
#[axum::debug_handler]
pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Extension(config): Extension<Config>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, cache, &config);

    match auth_service.logout(&claims.sub).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            serde_json::json!({}),
            "Logged out successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(
    Extension(user): Extension<PublicUser>,
) -> ResponseJson<ApiResponse<PublicUser>> {
    ResponseJson(ApiResponse::success(user, "User retrieved successfully"))
}

/// Handle self-service password change
#[axum::debug_handler]
pub async fn change_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool, cache);

    match user_service
        .change_password(&claims.sub, &payload.current_password, &payload.new_password)
        .await
    {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            serde_json::json!({}),
            "Password changed successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
