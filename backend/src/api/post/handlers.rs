//! Handler functions for blog post API endpoints.
//!
//! The public side only ever sees published posts; the admin side works
//! across drafts too.

use crate::api::common::{
    ApiResponse, PaginatedData, PaginationFilter, PaginationMeta, service_error_to_http,
};
use crate::database::models::{
    CreatePost, Post, PostComment, PostDetail, PostListItem, PostStatus, UpdatePost,
};
use crate::errors::ServiceError;
use crate::repositories::comment_repository::CommentRepository;
use crate::services::post_service::PostService;
use crate::services::validation_messages;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct AdminPostQuery {
    pub status: Option<PostStatus>,
    pub is_published: Option<bool>,
}

/// Paginated listing of published posts, newest first.
#[axum::debug_handler]
pub async fn list_posts(
    Extension(pool): Extension<SqlitePool>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<PaginatedData<PostListItem>>>, (StatusCode, String)> {
    if let Err(validation_errors) = filter.validate() {
        return Err(service_error_to_http(ServiceError::validation(
            validation_messages(validation_errors),
        )));
    }

    let (items, total) = PostService::new(&pool)
        .list_published(filter.limit(), filter.offset())
        .await
        .map_err(service_error_to_http)?;

    let pagination = PaginationMeta::from_filter(&filter, total);
    Ok(ResponseJson(ApiResponse::paginated(
        PaginatedData::new(items, total),
        pagination,
        "Request successful",
    )))
}

/// Public read by slug; counts the view.
#[axum::debug_handler]
pub async fn get_post_by_slug(
    Extension(pool): Extension<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<ResponseJson<ApiResponse<PostDetail>>, (StatusCode, String)> {
    let post = PostService::new(&pool)
        .read_published(&slug)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(post)))
}

/// Public read by id. Drafts stay hidden; no view counting here.
#[axum::debug_handler]
pub async fn get_post(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PostDetail>>, (StatusCode, String)> {
    let post = PostService::new(&pool)
        .get(&id)
        .await
        .map_err(service_error_to_http)?;

    if !post.post.post.is_published {
        return Err(service_error_to_http(ServiceError::not_found("Post", &id)));
    }

    Ok(ResponseJson(ApiResponse::ok(post)))
}

/// Bumps the like counter on a published post.
#[axum::debug_handler]
pub async fn like_post(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Post>>, (StatusCode, String)> {
    let post = PostService::new(&pool)
        .like(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(post)))
}

/// Approved comments under a post.
#[axum::debug_handler]
pub async fn post_comments(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<PostComment>>>, (StatusCode, String)> {
    let comments = CommentRepository::new(&pool)
        .approved_for_post(&id)
        .await
        .map_err(|e| service_error_to_http(ServiceError::from(e)))?;

    Ok(ResponseJson(ApiResponse::ok(comments)))
}

/// Admin listing across all posts with optional status filters.
#[axum::debug_handler]
pub async fn admin_list_posts(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<AdminPostQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<PostListItem>>>, (StatusCode, String)> {
    let posts = PostService::new(&pool)
        .list_all(query.status, query.is_published)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(posts)))
}

/// Creates a post authored by the current admin.
#[axum::debug_handler]
pub async fn create_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePost>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<PostDetail>>), (StatusCode, String)> {
    let post = PostService::new(&pool)
        .create(&claims.sub, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(post, "Post created successfully")),
    ))
}

#[axum::debug_handler]
pub async fn update_post(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePost>,
) -> Result<ResponseJson<ApiResponse<PostDetail>>, (StatusCode, String)> {
    let post = PostService::new(&pool)
        .update(&id, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        post,
        "Post updated successfully",
    )))
}

#[axum::debug_handler]
pub async fn delete_post(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    PostService::new(&pool)
        .delete(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        serde_json::json!({}),
        "Post deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use crate::api::post::routes::post_router;
    use crate::database::test_support::setup_pool;
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::SqlitePool;
    use tower::util::ServiceExt;

    fn test_app(pool: SqlitePool) -> Router {
        Router::new()
            .nest("/posts", post_router())
            .layer(Extension(pool))
    }

    #[tokio::test]
    async fn list_posts_rejects_out_of_range_pagination() {
        let pool = setup_pool().await;
        let app = test_app(pool);

        for uri in ["/posts?page=0", "/posts?limit=500", "/posts?per_page=500"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn list_posts_handles_the_largest_page_number() {
        let pool = setup_pool().await;
        let app = test_app(pool);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/posts?page=4294967295&limit=100")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
