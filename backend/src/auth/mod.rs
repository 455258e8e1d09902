//! Authentication module: registration, login, the access/refresh token
//! pair, and the middleware guarding protected routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
