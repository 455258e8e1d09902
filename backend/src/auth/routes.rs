//! HTTP routes for authentication and the authenticated profile.

use crate::auth::handlers::{change_password, login, logout, me, refresh_token, register};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Creates the authentication router mounted under `/auth`
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout).layer(middleware::from_fn(jwt_auth)))
}

/// Creates the profile router mounted under `/profile`; everything here
/// requires a bearer token
pub fn profile_router() -> Router {
    Router::new()
        .route("/", get(me))
        .route("/password", put(change_password))
        .layer(middleware::from_fn(jwt_auth))
}
