//! Database repository for tool categories.

use crate::database::models::{ToolCategory, ToolCategoryStats, ToolCategoryWithCount};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const CATEGORY_COLUMNS: &str =
    "c.id, c.name, c.slug, c.description, c.icon, c.sort_order, c.is_active, \
     c.created_at, c.updated_at";

const TOOL_COUNT: &str = "(SELECT COUNT(*) FROM tools t WHERE t.category_id = c.id) AS tool_count";

#[derive(Debug, Default)]
pub struct ToolCategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

pub struct ToolCategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ToolCategoryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        id: &str,
        name: &str,
        slug: &str,
        description: Option<&str>,
        icon: Option<&str>,
        sort_order: i64,
        is_active: bool,
    ) -> Result<ToolCategory> {
        let now = Utc::now();
        let category = sqlx::query_as::<_, ToolCategory>(
            r#"
            INSERT INTO tool_categories (id, name, slug, description, icon, sort_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, slug, description, icon, sort_order, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(icon)
        .bind(sort_order)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<ToolCategoryWithCount>> {
        let category = sqlx::query_as::<_, ToolCategoryWithCount>(&format!(
            "SELECT {CATEGORY_COLUMNS}, {TOOL_COUNT} FROM tool_categories c WHERE c.id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ToolCategoryWithCount>> {
        let category = sqlx::query_as::<_, ToolCategoryWithCount>(&format!(
            "SELECT {CATEGORY_COLUMNS}, {TOOL_COUNT} FROM tool_categories c WHERE c.slug = ?"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Lists categories with tool counts, optionally filtered by active flag.
    pub async fn list(&self, is_active: Option<bool>) -> Result<Vec<ToolCategoryWithCount>> {
        let categories = sqlx::query_as::<_, ToolCategoryWithCount>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}, {TOOL_COUNT}
            FROM tool_categories c
            WHERE (? IS NULL OR c.is_active = ?)
            ORDER BY c.sort_order ASC, c.created_at DESC
            "#
        ))
        .bind(is_active)
        .bind(is_active)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn name_exists_excluding(&self, name: &str, exclude_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tool_categories WHERE name = ? AND id != ?")
                .bind(name)
                .bind(exclude_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn slug_exists_excluding(&self, slug: &str, exclude_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tool_categories WHERE slug = ? AND id != ?")
                .bind(slug)
                .bind(exclude_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn update(
        &self,
        id: &str,
        changes: ToolCategoryChanges,
    ) -> Result<Option<ToolCategory>> {
        let category = sqlx::query_as::<_, ToolCategory>(
            r#"
            UPDATE tool_categories SET
                name = COALESCE(?, name),
                slug = COALESCE(?, slug),
                description = COALESCE(?, description),
                icon = COALESCE(?, icon),
                sort_order = COALESCE(?, sort_order),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING id, name, slug, description, icon, sort_order, is_active, created_at, updated_at
            "#,
        )
        .bind(changes.name)
        .bind(changes.slug)
        .bind(changes.description)
        .bind(changes.icon)
        .bind(changes.sort_order)
        .bind(changes.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tool_categories WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total/active/inactive counts for the admin dashboard.
    pub async fn stats(&self) -> Result<ToolCategoryStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tool_categories")
            .fetch_one(self.pool)
            .await?;
        let active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tool_categories WHERE is_active = 1")
                .fetch_one(self.pool)
                .await?;

        Ok(ToolCategoryStats {
            total,
            active,
            inactive: total - active,
        })
    }
}
