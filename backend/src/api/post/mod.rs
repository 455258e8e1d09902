//! Module for blog post API endpoints.

pub mod handlers;
pub mod routes;
