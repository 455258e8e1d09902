//! Main entry point for the toolbox platform backend.
//!
//! Initializes tracing, configuration, the SQLite pool, and the session
//! cache, then assembles the public, auth, and admin routers and serves them
//! over Axum.

mod api;
mod auth;
mod cache;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use auth::middleware::{admin_auth, jwt_auth};
use axum::{Extension, Router, http::HeaderValue, middleware, response::Json, routing::get};
use config::Config;
use database::Database;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    let pool = db.pool().clone();
    let session_cache = cache::connect(&config).await;

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let admin_routes = Router::new()
        .nest("/tools", api::tool::routes::admin_tool_router())
        .nest(
            "/tool-categories",
            api::tool_category::routes::admin_tool_category_router(),
        )
        .nest("/users", api::user::routes::admin_user_router())
        .nest("/posts", api::post::routes::admin_post_router())
        .nest("/uploads", api::upload::routes::admin_upload_router())
        .nest("/comments", api::comment::routes::admin_comment_router())
        .nest("/tags", api::tag::routes::admin_tag_router())
        .nest("/settings", api::setting::routes::admin_setting_router())
        // Layers run bottom-up: jwt_auth authenticates, admin_auth gates.
        .layer(middleware::from_fn(admin_auth))
        .layer(middleware::from_fn(jwt_auth));

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/profile", auth::routes::profile_router())
        .nest("/tools", api::tool::routes::tool_router())
        .nest(
            "/tool-categories",
            api::tool_category::routes::tool_category_router(),
        )
        .nest("/posts", api::post::routes::post_router())
        .nest("/tags", api::tag::routes::tag_router())
        .nest("/comments", api::comment::routes::comment_router())
        .nest("/settings", api::setting::routes::setting_router())
        .nest("/admin", admin_routes)
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(pool))
        .layer(Extension(session_cache))
        .layer(Extension(config.clone()));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting server on port {}", config.server_port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Production locks CORS to the configured origins; development stays
/// permissive for local frontends.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_production() {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    }
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Toolbox Backend",
            "version": env!("CARGO_PKG_VERSION"),
        }),
        "Service is running",
    ))
}
