//! Persistence layer: one repository per table.

pub mod comment_repository;
pub mod post_repository;
pub mod refresh_token_repository;
pub mod setting_repository;
pub mod tag_repository;
pub mod tool_category_repository;
pub mod tool_repository;
pub mod user_repository;
