//! Module for tool directory API endpoints.

pub mod handlers;
pub mod routes;
