//! Module for site settings API endpoints.

pub mod handlers;
pub mod routes;
