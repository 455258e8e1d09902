//! HTTP routes for admin user management.

use super::handlers::{delete_user, get_user, list_users, update_user};
use axum::{Router, routing::get};

/// Admin user routes mounted under `/admin/users`
pub fn admin_user_router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}
