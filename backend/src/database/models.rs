//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database, together with the create/update DTOs accepted by the
//! API layer. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// User role tier. ADMIN is the only elevated tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User projection safe to hand outside the credential store.
///
/// Everything except the password hash. This is also the shape mirrored into
/// the cache under `user:<id>`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration / account-creation payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(
        min = 3,
        max = 255,
        message = "Username must be between 3-255 characters"
    ))]
    pub username: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Internal record handed to the user repository after hashing.
#[derive(Debug, Clone)]
pub struct CreateUserRecord {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Admin-side partial user update. `password` is re-hashed before storage.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email(message = "Must be a valid email"))]
    pub email: Option<String>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: Option<String>,

    pub role: Option<UserRole>,
    pub is_active: Option<bool>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToolCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category plus the number of tools that reference it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ToolCategoryWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: ToolCategory,
    pub tool_count: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateToolCategory {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Slug must be between 1-255 characters"))]
    pub slug: String,

    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateToolCategory {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Slug must be between 1-255 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// Aggregate counts for the admin category dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCategoryStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub category_id: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tool joined with its category name, as rendered by the directory.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ToolWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tool: Tool,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTool {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(url(message = "Must be a valid URL"))]
    pub url: Option<String>,

    pub icon: Option<String>,
    pub category_id: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTool {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(url(message = "Must be a valid URL"))]
    pub url: Option<String>,

    pub icon: Option<String>,
    pub category_id: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// Post lifecycle state. Mirrors `is_published` but survives unpublishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: PostStatus,
    pub is_published: bool,
    pub view_count: i64,
    pub like_count: i64,
    pub author_id: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post joined with its author name and comment count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    pub author_username: String,
    pub comment_count: i64,
}

/// Full post view: list row plus tags and approved comments.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostWithAuthor,
    pub tags: Vec<Tag>,
    pub comments: Vec<PostComment>,
}

/// Post list entry with tags resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PostListItem {
    #[serde(flatten)]
    pub post: PostWithAuthor,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "Slug must be between 1-255 characters"))]
    pub slug: String,

    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub cover_image: Option<String>,
    pub is_published: Option<bool>,
    /// Tag names; missing tags are created on the fly.
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePost {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Slug must be between 1-255 characters"))]
    pub slug: Option<String>,

    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub is_published: Option<bool>,
    /// `Some(vec![])` clears all tags; `None` leaves them untouched.
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TagWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tag: Tag,
    pub post_count: i64,
}

/// Tag detail with the posts carrying it.
#[derive(Debug, Clone, Serialize)]
pub struct TagDetail {
    #[serde(flatten)]
    pub tag: Tag,
    pub posts: Vec<PostWithAuthor>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTag {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    /// Derived from the name when omitted.
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTag {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Slug must be between 1-255 characters"))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostComment {
    pub id: String,
    pub post_id: String,
    pub user_id: Option<String>,
    pub author: String,
    pub email: Option<String>,
    pub content: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its post title for the moderation queue.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentWithPost {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: PostComment,
    pub post_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "Post ID is required"))]
    pub post_id: String,

    #[validate(length(min = 1, max = 2000, message = "Content must be between 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
