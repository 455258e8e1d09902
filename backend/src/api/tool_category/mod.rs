//! Module for tool category API endpoints.

pub mod handlers;
pub mod routes;
