//! Handler functions for tag API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{CreateTag, Tag, TagDetail, TagWithCount, UpdateTag};
use crate::services::tag_service::TagService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// All tags with post counts, alphabetical.
#[axum::debug_handler]
pub async fn list_tags(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<Vec<TagWithCount>>>, (StatusCode, String)> {
    let tags = TagService::new(&pool)
        .list()
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(tags)))
}

/// Tag detail with the posts carrying it.
#[axum::debug_handler]
pub async fn get_tag(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<TagDetail>>, (StatusCode, String)> {
    let tag = TagService::new(&pool)
        .get(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(tag)))
}

#[axum::debug_handler]
pub async fn create_tag(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateTag>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Tag>>), (StatusCode, String)> {
    let tag = TagService::new(&pool)
        .create(payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(tag, "Tag created successfully")),
    ))
}

#[axum::debug_handler]
pub async fn update_tag(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTag>,
) -> Result<ResponseJson<ApiResponse<Tag>>, (StatusCode, String)> {
    let tag = TagService::new(&pool)
        .update(&id, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        tag,
        "Tag updated successfully",
    )))
}

#[axum::debug_handler]
pub async fn delete_tag(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    TagService::new(&pool)
        .delete(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        serde_json::json!({}),
        "Tag deleted successfully",
    )))
}
