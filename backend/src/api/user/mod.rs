//! Module for admin user management API endpoints.

pub mod handlers;
pub mod routes;
