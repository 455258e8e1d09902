//! Database repository for blog posts.

use crate::database::models::{Post, PostStatus, PostWithAuthor};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const POST_COLUMNS: &str =
    "p.id, p.title, p.slug, p.excerpt, p.content, p.cover_image, p.status, p.is_published, \
     p.view_count, p.like_count, p.author_id, p.published_at, p.created_at, p.updated_at";

const AUTHOR_AND_COUNT: &str = "u.username AS author_username, \
     (SELECT COUNT(*) FROM post_comments pc WHERE pc.post_id = p.id) AS comment_count";

/// Fields applied on update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
    pub is_published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id: &str,
        title: &str,
        slug: &str,
        excerpt: Option<&str>,
        content: &str,
        cover_image: Option<&str>,
        status: PostStatus,
        is_published: bool,
        author_id: &str,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Post> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, slug, excerpt, content, cover_image, status, is_published,
                               view_count, like_count, author_id, published_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?, ?, ?)
            RETURNING id, title, slug, excerpt, content, cover_image, status, is_published,
                      view_count, like_count, author_id, published_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(slug)
        .bind(excerpt)
        .bind(content)
        .bind(cover_image)
        .bind(status)
        .bind(is_published)
        .bind(author_id)
        .bind(published_at)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(post)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<PostWithAuthor>> {
        let post = sqlx::query_as::<_, PostWithAuthor>(&format!(
            r#"
            SELECT {POST_COLUMNS}, {AUTHOR_AND_COUNT}
            FROM posts p
            JOIN users u ON p.author_id = u.id
            WHERE p.id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<PostWithAuthor>> {
        let post = sqlx::query_as::<_, PostWithAuthor>(&format!(
            r#"
            SELECT {POST_COLUMNS}, {AUTHOR_AND_COUNT}
            FROM posts p
            JOIN users u ON p.author_id = u.id
            WHERE p.slug = ?
            "#
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Published posts, newest publication first.
    pub async fn list_published(&self, limit: u64, offset: u64) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            r#"
            SELECT {POST_COLUMNS}, {AUTHOR_AND_COUNT}
            FROM posts p
            JOIN users u ON p.author_id = u.id
            WHERE p.is_published = 1 AND p.status = 'PUBLISHED'
            ORDER BY p.published_at DESC
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_published(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE is_published = 1 AND status = 'PUBLISHED'",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    /// Admin listing across all posts with optional status filters.
    pub async fn list_all(
        &self,
        status: Option<PostStatus>,
        is_published: Option<bool>,
    ) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            r#"
            SELECT {POST_COLUMNS}, {AUTHOR_AND_COUNT}
            FROM posts p
            JOIN users u ON p.author_id = u.id
            WHERE (? IS NULL OR p.status = ?)
              AND (? IS NULL OR p.is_published = ?)
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(status)
        .bind(status)
        .bind(is_published)
        .bind(is_published)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn slug_exists_excluding(&self, slug: &str, exclude_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn update(&self, id: &str, changes: PostChanges) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET
                title = COALESCE(?, title),
                slug = COALESCE(?, slug),
                excerpt = COALESCE(?, excerpt),
                content = COALESCE(?, content),
                cover_image = COALESCE(?, cover_image),
                status = COALESCE(?, status),
                is_published = COALESCE(?, is_published),
                published_at = COALESCE(?, published_at),
                updated_at = ?
            WHERE id = ?
            RETURNING id, title, slug, excerpt, content, cover_image, status, is_published,
                      view_count, like_count, author_id, published_at, created_at, updated_at
            "#,
        )
        .bind(changes.title)
        .bind(changes.slug)
        .bind(changes.excerpt)
        .bind(changes.content)
        .bind(changes.cover_image)
        .bind(changes.status)
        .bind(changes.is_published)
        .bind(changes.published_at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_view_count(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Bumps the like counter and returns the updated post.
    pub async fn increment_like_count(&self, id: &str) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET like_count = like_count + 1 WHERE id = ?
            RETURNING id, title, slug, excerpt, content, cover_image, status, is_published,
                      view_count, like_count, author_id, published_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }
}
