//! HTTP routes for tool categories.

use super::handlers::{
    admin_list_categories, category_stats, create_category, delete_category, get_category,
    get_category_by_slug, list_categories, update_category,
};
use axum::{
    Router,
    routing::{get, put},
};

/// Public category routes mounted under `/tool-categories`
pub fn tool_category_router() -> Router {
    Router::new()
        .route("/", get(list_categories))
        .route("/{id}", get(get_category))
        .route("/slug/{slug}", get(get_category_by_slug))
}

/// Admin category routes mounted under `/admin/tool-categories`
pub fn admin_tool_category_router() -> Router {
    Router::new()
        .route("/", get(admin_list_categories).post(create_category))
        .route("/stats", get(category_stats))
        .route("/{id}", put(update_category).delete(delete_category))
}
