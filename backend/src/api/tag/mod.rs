//! Module for tag API endpoints.

pub mod handlers;
pub mod routes;
