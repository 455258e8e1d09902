//! HTTP routes for blog posts.

use super::handlers::{
    admin_list_posts, create_post, delete_post, get_post, get_post_by_slug, like_post, list_posts,
    post_comments, update_post,
};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Public post routes mounted under `/posts`
pub fn post_router() -> Router {
    Router::new()
        .route("/", get(list_posts))
        .route("/slug/{slug}", get(get_post_by_slug))
        .route("/{id}", get(get_post))
        .route("/{id}/like", post(like_post))
        .route("/{id}/comments", get(post_comments))
}

/// Admin post routes mounted under `/admin/posts`
pub fn admin_post_router() -> Router {
    Router::new()
        .route("/", get(admin_list_posts).post(create_post))
        .route("/{id}", put(update_post).delete(delete_post))
}
