//! HTTP routes for tags.

use super::handlers::{create_tag, delete_tag, get_tag, list_tags, update_tag};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Public tag routes mounted under `/tags`
pub fn tag_router() -> Router {
    Router::new()
        .route("/", get(list_tags))
        .route("/{id}", get(get_tag))
}

/// Admin tag routes mounted under `/admin/tags`
pub fn admin_tag_router() -> Router {
    Router::new()
        .route("/", post(create_tag))
        .route("/{id}", put(update_tag).delete(delete_tag))
}
