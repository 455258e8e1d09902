//! Database repository for tags and the post-tag link table.

use crate::database::models::{PostWithAuthor, Tag, TagWithCount};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const TAG_COLUMNS: &str = "g.id, g.name, g.slug, g.created_at";

#[derive(Debug, Default)]
pub struct TagChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
}

pub struct TagRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TagRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, id: &str, name: &str, slug: &str) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name, slug, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, slug, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(tag)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, name, slug, created_at FROM tags WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tag)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, name, slug, created_at FROM tags WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(tag)
    }

    /// All tags with their post counts, alphabetical.
    pub async fn list_with_counts(&self) -> Result<Vec<TagWithCount>> {
        let tags = sqlx::query_as::<_, TagWithCount>(&format!(
            r#"
            SELECT {TAG_COLUMNS},
                   (SELECT COUNT(*) FROM post_tags pt WHERE pt.tag_id = g.id) AS post_count
            FROM tags g
            ORDER BY g.name ASC
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    pub async fn name_exists_excluding(&self, name: &str, exclude_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE name = ? AND id != ?")
            .bind(name)
            .bind(exclude_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn update(&self, id: &str, changes: TagChanges) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags SET
                name = COALESCE(?, name),
                slug = COALESCE(?, slug)
            WHERE id = ?
            RETURNING id, name, slug, created_at
            "#,
        )
        .bind(changes.name)
        .bind(changes.slug)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tag)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Tags attached to a post, alphabetical.
    pub async fn tags_for_post(&self, post_id: &str) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(&format!(
            r#"
            SELECT {TAG_COLUMNS}
            FROM tags g
            JOIN post_tags pt ON pt.tag_id = g.id
            WHERE pt.post_id = ?
            ORDER BY g.name ASC
            "#
        ))
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Posts carrying a tag, newest first.
    pub async fn posts_for_tag(&self, tag_id: &str) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.title, p.slug, p.excerpt, p.content, p.cover_image, p.status,
                   p.is_published, p.view_count, p.like_count, p.author_id, p.published_at,
                   p.created_at, p.updated_at,
                   u.username AS author_username,
                   (SELECT COUNT(*) FROM post_comments pc WHERE pc.post_id = p.id) AS comment_count
            FROM posts p
            JOIN post_tags pt ON pt.post_id = p.id
            JOIN users u ON p.author_id = u.id
            WHERE pt.tag_id = ?
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(tag_id)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Attaches a tag to a post; duplicate links are ignored.
    pub async fn link_post(&self, post_id: &str, tag_id: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn clear_post_tags(&self, post_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
