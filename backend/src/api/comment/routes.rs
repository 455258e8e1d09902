//! HTTP routes for comments.

use super::handlers::{approve_comment, create_comment, delete_comment, list_comments};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

/// Public comment routes mounted under `/comments`. Submission requires a
/// bearer token but not the admin role.
pub fn comment_router() -> Router {
    Router::new()
        .route("/", post(create_comment))
        .layer(middleware::from_fn(jwt_auth))
}

/// Admin moderation routes mounted under `/admin/comments`
pub fn admin_comment_router() -> Router {
    Router::new()
        .route("/", get(list_comments))
        .route("/{id}/approve", put(approve_comment))
        .route("/{id}", delete(delete_comment))
}
