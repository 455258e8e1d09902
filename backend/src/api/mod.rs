//! Central module for organizing the application's main API endpoints.
//!
//! Each resource gets its own submodule with handlers and routes; the auth
//! endpoints live separately under `crate::auth`.

pub mod comment;
pub mod common;
pub mod post;
pub mod setting;
pub mod tag;
pub mod tool;
pub mod tool_category;
pub mod upload;
pub mod user;
