//! Database repository for the tool directory.

use crate::database::models::{Tool, ToolWithCategory};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const TOOL_COLUMNS: &str = "t.id, t.name, t.description, t.url, t.icon, t.category_id, \
     t.sort_order, t.is_active, t.created_at, t.updated_at";

/// Fields applied on update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ToolChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub category_id: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

pub struct ToolRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ToolRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        url: Option<&str>,
        icon: Option<&str>,
        category_id: Option<&str>,
        sort_order: i64,
        is_active: bool,
    ) -> Result<Tool> {
        let now = Utc::now();
        let tool = sqlx::query_as::<_, Tool>(
            r#"
            INSERT INTO tools (id, name, description, url, icon, category_id, sort_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, url, icon, category_id, sort_order, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(url)
        .bind(icon)
        .bind(category_id)
        .bind(sort_order)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(tool)
    }

    /// Retrieves a tool joined with its category name.
    pub async fn get_with_category(&self, id: &str) -> Result<Option<ToolWithCategory>> {
        let tool = sqlx::query_as::<_, ToolWithCategory>(&format!(
            r#"
            SELECT {TOOL_COLUMNS}, c.name AS category_name
            FROM tools t
            LEFT JOIN tool_categories c ON t.category_id = c.id
            WHERE t.id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tool)
    }

    /// Lists tools, optionally filtered by active flag, in directory order.
    pub async fn list(&self, is_active: Option<bool>) -> Result<Vec<ToolWithCategory>> {
        let tools = sqlx::query_as::<_, ToolWithCategory>(&format!(
            r#"
            SELECT {TOOL_COLUMNS}, c.name AS category_name
            FROM tools t
            LEFT JOIN tool_categories c ON t.category_id = c.id
            WHERE (? IS NULL OR t.is_active = ?)
            ORDER BY t.sort_order ASC, t.created_at DESC
            "#
        ))
        .bind(is_active)
        .bind(is_active)
        .fetch_all(self.pool)
        .await?;

        Ok(tools)
    }

    /// Lists active tools within a category, in directory order.
    pub async fn list_by_category(&self, category_id: &str, only_active: bool) -> Result<Vec<Tool>> {
        let tools = sqlx::query_as::<_, Tool>(
            r#"
            SELECT id, name, description, url, icon, category_id, sort_order, is_active, created_at, updated_at
            FROM tools
            WHERE category_id = ? AND (? = 0 OR is_active = 1)
            ORDER BY sort_order ASC, created_at DESC
            "#,
        )
        .bind(category_id)
        .bind(only_active)
        .fetch_all(self.pool)
        .await?;

        Ok(tools)
    }

    pub async fn count_in_category(&self, category_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tools WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn update(&self, id: &str, changes: ToolChanges) -> Result<Option<Tool>> {
        let tool = sqlx::query_as::<_, Tool>(
            r#"
            UPDATE tools SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                url = COALESCE(?, url),
                icon = COALESCE(?, icon),
                category_id = COALESCE(?, category_id),
                sort_order = COALESCE(?, sort_order),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING id, name, description, url, icon, category_id, sort_order, is_active, created_at, updated_at
            "#,
        )
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.url)
        .bind(changes.icon)
        .bind(changes.category_id)
        .bind(changes.sort_order)
        .bind(changes.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tool)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tools WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
