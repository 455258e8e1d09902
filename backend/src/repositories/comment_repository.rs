//! Database repository for post comments.

use crate::database::models::{CommentWithPost, PostComment};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const COMMENT_COLUMNS: &str =
    "pc.id, pc.post_id, pc.user_id, pc.author, pc.email, pc.content, pc.is_approved, pc.created_at";

pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a comment. New comments always start unapproved.
    pub async fn create(
        &self,
        id: &str,
        post_id: &str,
        user_id: Option<&str>,
        author: &str,
        email: Option<&str>,
        content: &str,
    ) -> Result<PostComment> {
        let comment = sqlx::query_as::<_, PostComment>(
            r#"
            INSERT INTO post_comments (id, post_id, user_id, author, email, content, is_approved, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            RETURNING id, post_id, user_id, author, email, content, is_approved, created_at
            "#,
        )
        .bind(id)
        .bind(post_id)
        .bind(user_id)
        .bind(author)
        .bind(email)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<PostComment>> {
        let comment = sqlx::query_as::<_, PostComment>(
            r#"
            SELECT id, post_id, user_id, author, email, content, is_approved, created_at
            FROM post_comments WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(comment)
    }

    /// Moderation listing with optional post and approval filters.
    pub async fn list(
        &self,
        post_id: Option<&str>,
        is_approved: Option<bool>,
    ) -> Result<Vec<CommentWithPost>> {
        let comments = sqlx::query_as::<_, CommentWithPost>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}, p.title AS post_title
            FROM post_comments pc
            LEFT JOIN posts p ON pc.post_id = p.id
            WHERE (? IS NULL OR pc.post_id = ?)
              AND (? IS NULL OR pc.is_approved = ?)
            ORDER BY pc.created_at DESC
            "#
        ))
        .bind(post_id)
        .bind(post_id)
        .bind(is_approved)
        .bind(is_approved)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }

    /// Approved comments under a post, newest first.
    pub async fn approved_for_post(&self, post_id: &str) -> Result<Vec<PostComment>> {
        let comments = sqlx::query_as::<_, PostComment>(
            r#"
            SELECT id, post_id, user_id, author, email, content, is_approved, created_at
            FROM post_comments
            WHERE post_id = ? AND is_approved = 1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn approve(&self, id: &str) -> Result<Option<PostComment>> {
        let comment = sqlx::query_as::<_, PostComment>(
            r#"
            UPDATE post_comments SET is_approved = 1 WHERE id = ?
            RETURNING id, post_id, user_id, author, email, content, is_approved, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_comments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
