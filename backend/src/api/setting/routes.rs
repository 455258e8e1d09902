//! HTTP routes for site settings.

use super::handlers::{get_setting, list_settings, update_settings};
use axum::{
    Router,
    routing::{get, put},
};

/// Public settings routes mounted under `/settings`
pub fn setting_router() -> Router {
    Router::new()
        .route("/", get(list_settings))
        .route("/{key}", get(get_setting))
}

/// Admin settings routes mounted under `/admin/settings`
pub fn admin_setting_router() -> Router {
    Router::new().route("/", put(update_settings))
}
