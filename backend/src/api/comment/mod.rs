//! Module for comment submission and moderation API endpoints.

pub mod handlers;
pub mod routes;
