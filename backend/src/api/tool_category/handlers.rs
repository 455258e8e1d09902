//! Handler functions for tool category API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{
    CreateToolCategory, ToolCategory, ToolCategoryStats, ToolCategoryWithCount, UpdateToolCategory,
};
use crate::services::tool_category_service::ToolCategoryService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    pub is_active: Option<bool>,
}

/// Lists categories with tool counts. An absent `is_active` flag returns
/// every category.
#[axum::debug_handler]
pub async fn list_categories(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<CategoryListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ToolCategoryWithCount>>>, (StatusCode, String)> {
    let categories = ToolCategoryService::new(&pool)
        .list(query.is_active)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(categories)))
}

#[axum::debug_handler]
pub async fn get_category(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<ToolCategoryWithCount>>, (StatusCode, String)> {
    let category = ToolCategoryService::new(&pool)
        .get(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(category)))
}

#[axum::debug_handler]
pub async fn get_category_by_slug(
    Extension(pool): Extension<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<ResponseJson<ApiResponse<ToolCategoryWithCount>>, (StatusCode, String)> {
    let category = ToolCategoryService::new(&pool)
        .get_by_slug(&slug)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(category)))
}

/// Admin listing across all categories, inactive included.
#[axum::debug_handler]
pub async fn admin_list_categories(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<CategoryListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ToolCategoryWithCount>>>, (StatusCode, String)> {
    let categories = ToolCategoryService::new(&pool)
        .list(query.is_active)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(categories)))
}

#[axum::debug_handler]
pub async fn create_category(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateToolCategory>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<ToolCategory>>), (StatusCode, String)> {
    let category = ToolCategoryService::new(&pool)
        .create(payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(
            category,
            "Category created successfully",
        )),
    ))
}

#[axum::debug_handler]
pub async fn update_category(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateToolCategory>,
) -> Result<ResponseJson<ApiResponse<ToolCategory>>, (StatusCode, String)> {
    let category = ToolCategoryService::new(&pool)
        .update(&id, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        category,
        "Category updated successfully",
    )))
}

/// Deletes a category. Refused with 409 while tools still reference it.
#[axum::debug_handler]
pub async fn delete_category(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    ToolCategoryService::new(&pool)
        .delete(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        serde_json::json!({}),
        "Category deleted successfully",
    )))
}

/// Aggregate counts for the admin dashboard.
#[axum::debug_handler]
pub async fn category_stats(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<ToolCategoryStats>>, (StatusCode, String)> {
    let stats = ToolCategoryService::new(&pool)
        .stats()
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(stats)))
}
