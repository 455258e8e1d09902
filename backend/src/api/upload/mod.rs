//! Module for admin file upload endpoints.

pub mod handlers;
pub mod routes;
