//! HTTP routes for the tool directory.

use super::handlers::{
    admin_list_tools, create_tool, delete_tool, get_tool, list_tool_categories, list_tools,
    update_tool,
};
use axum::{
    Router,
    routing::{get, put},
};

/// Public tool routes mounted under `/tools`
pub fn tool_router() -> Router {
    Router::new()
        .route("/", get(list_tools))
        .route("/categories", get(list_tool_categories))
        .route("/{id}", get(get_tool))
}

/// Admin tool routes mounted under `/admin/tools`
pub fn admin_tool_router() -> Router {
    Router::new()
        .route("/", get(admin_list_tools).post(create_tool))
        .route("/{id}", put(update_tool).delete(delete_tool))
}
