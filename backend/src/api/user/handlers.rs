//! Handler functions for admin user management.
//!
//! Everything here returns sanitized users; password hashes never cross the
//! API boundary.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::cache::SharedCache;
use crate::database::models::{PublicUser, UpdateUser};
use crate::errors::ServiceError;
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn list_users(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
) -> Result<ResponseJson<ApiResponse<Vec<PublicUser>>>, (StatusCode, String)> {
    let users = UserService::new(&pool, cache)
        .list_users()
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(users)))
}

#[axum::debug_handler]
pub async fn get_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    let user = UserService::new(&pool, cache)
        .get_public_required(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(user)))
}

#[axum::debug_handler]
pub async fn update_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUser>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    let user = UserService::new(&pool, cache)
        .update_user(&id, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        user,
        "User updated successfully",
    )))
}

/// Deletes a user. Admins cannot delete their own account.
#[axum::debug_handler]
pub async fn delete_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(cache): Extension<SharedCache>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    if claims.user_id() == id {
        return Err(service_error_to_http(ServiceError::permission_denied(
            "Cannot delete your own account",
        )));
    }

    UserService::new(&pool, cache)
        .remove_user(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        serde_json::json!({}),
        "User deleted successfully",
    )))
}
