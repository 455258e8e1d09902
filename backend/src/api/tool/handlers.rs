//! Handler functions for tool directory API endpoints.
//!
//! The public side lists active tools for the directory page; the admin side
//! carries full CRUD.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{CreateTool, Tool, ToolCategoryWithCount, ToolWithCategory, UpdateTool};
use crate::services::tool_category_service::ToolCategoryService;
use crate::services::tool_service::ToolService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct ToolListQuery {
    pub is_active: Option<bool>,
}

/// Lists tools for the public directory. An absent `is_active` flag returns
/// every tool, active or not.
#[axum::debug_handler]
pub async fn list_tools(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<ToolListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ToolWithCategory>>>, (StatusCode, String)> {
    let tools = ToolService::new(&pool)
        .list(query.is_active)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(tools)))
}

/// Lists active categories with counts, for the directory sidebar.
#[axum::debug_handler]
pub async fn list_tool_categories(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<Vec<ToolCategoryWithCount>>>, (StatusCode, String)> {
    let categories = ToolCategoryService::new(&pool)
        .list(Some(true))
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(categories)))
}

/// Retrieves a single tool with its category name.
#[axum::debug_handler]
pub async fn get_tool(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<ToolWithCategory>>, (StatusCode, String)> {
    let tool = ToolService::new(&pool)
        .get(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(tool)))
}

/// Admin listing across all tools, inactive included.
#[axum::debug_handler]
pub async fn admin_list_tools(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<ToolListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ToolWithCategory>>>, (StatusCode, String)> {
    let tools = ToolService::new(&pool)
        .list(query.is_active)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(tools)))
}

/// Creates a new tool.
#[axum::debug_handler]
pub async fn create_tool(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateTool>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Tool>>), (StatusCode, String)> {
    let tool = ToolService::new(&pool)
        .create(payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(tool, "Tool created successfully")),
    ))
}

/// Updates a tool.
#[axum::debug_handler]
pub async fn update_tool(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTool>,
) -> Result<ResponseJson<ApiResponse<Tool>>, (StatusCode, String)> {
    let tool = ToolService::new(&pool)
        .update(&id, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        tool,
        "Tool updated successfully",
    )))
}

/// Deletes a tool.
#[axum::debug_handler]
pub async fn delete_tool(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    ToolService::new(&pool)
        .delete(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        serde_json::json!({}),
        "Tool deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use crate::api::tool::routes::tool_router;
    use crate::database::models::CreateTool;
    use crate::database::test_support::setup_pool;
    use crate::services::tool_service::ToolService;
    use axum::{
        Extension, Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn tool_request(name: &str, is_active: Option<bool>) -> CreateTool {
        CreateTool {
            name: name.to_string(),
            description: None,
            url: Some("https://example.com".to_string()),
            icon: None,
            category_id: None,
            sort_order: None,
            is_active,
        }
    }

    async fn listed_names(app: &Router, uri: &str) -> Vec<String> {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn public_listing_includes_inactive_tools_unless_filtered() {
        let pool = setup_pool().await;
        let service = ToolService::new(&pool);
        service
            .create(tool_request("Formatter", None))
            .await
            .unwrap();
        service
            .create(tool_request("Retired", Some(false)))
            .await
            .unwrap();

        let app = Router::new()
            .nest("/tools", tool_router())
            .layer(Extension(pool.clone()));

        let mut all = listed_names(&app, "/tools").await;
        all.sort();
        assert_eq!(all, ["Formatter", "Retired"]);

        assert_eq!(
            listed_names(&app, "/tools?is_active=true").await,
            ["Formatter"]
        );
        assert_eq!(
            listed_names(&app, "/tools?is_active=false").await,
            ["Retired"]
        );
    }
}
