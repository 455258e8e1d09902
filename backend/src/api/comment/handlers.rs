//! Handler functions for comment submission and the moderation queue.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{CommentWithPost, CreateComment, PostComment, PublicUser};
use crate::services::comment_service::CommentService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub post_id: Option<String>,
    pub is_approved: Option<bool>,
}

/// Submits a comment as the authenticated user; it lands in the moderation
/// queue unapproved.
#[axum::debug_handler]
pub async fn create_comment(
    Extension(pool): Extension<SqlitePool>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<CreateComment>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<PostComment>>), (StatusCode, String)> {
    let comment = CommentService::new(&pool)
        .create(&user, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(
            comment,
            "Comment submitted for moderation",
        )),
    ))
}

/// Moderation listing with optional post and approval filters.
#[axum::debug_handler]
pub async fn list_comments(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<CommentListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<CommentWithPost>>>, (StatusCode, String)> {
    let comments = CommentService::new(&pool)
        .list(query.post_id.as_deref(), query.is_approved)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(comments)))
}

#[axum::debug_handler]
pub async fn approve_comment(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PostComment>>, (StatusCode, String)> {
    let comment = CommentService::new(&pool)
        .approve(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        comment,
        "Comment approved",
    )))
}

#[axum::debug_handler]
pub async fn delete_comment(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    CommentService::new(&pool)
        .delete(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        serde_json::json!({}),
        "Comment deleted successfully",
    )))
}
