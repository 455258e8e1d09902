//! Tool directory business logic.

use crate::database::models::{CreateTool, Tool, ToolWithCategory, UpdateTool};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::tool_category_repository::ToolCategoryRepository;
use crate::repositories::tool_repository::{ToolChanges, ToolRepository};
use crate::services::validation_messages;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct ToolService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ToolService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a tool. A referenced category must exist.
    pub async fn create(&self, input: CreateTool) -> ServiceResult<Tool> {
        if let Err(validation_errors) = input.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        if let Some(category_id) = &input.category_id {
            self.require_category(category_id).await?;
        }

        let tool = ToolRepository::new(self.pool)
            .create(
                &Uuid::now_v7().to_string(),
                &input.name,
                input.description.as_deref(),
                input.url.as_deref(),
                input.icon.as_deref(),
                input.category_id.as_deref(),
                input.sort_order.unwrap_or(0),
                input.is_active.unwrap_or(true),
            )
            .await?;

        Ok(tool)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<ToolWithCategory> {
        ToolRepository::new(self.pool)
            .get_with_category(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool", id))
    }

    pub async fn list(&self, is_active: Option<bool>) -> ServiceResult<Vec<ToolWithCategory>> {
        Ok(ToolRepository::new(self.pool).list(is_active).await?)
    }

    /// Active tools in a category, for the public directory page.
    pub async fn list_by_category(&self, category_id: &str) -> ServiceResult<Vec<Tool>> {
        self.require_category(category_id).await?;
        Ok(ToolRepository::new(self.pool)
            .list_by_category(category_id, true)
            .await?)
    }

    pub async fn update(&self, id: &str, update: UpdateTool) -> ServiceResult<Tool> {
        if let Err(validation_errors) = update.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        if let Some(category_id) = &update.category_id {
            self.require_category(category_id).await?;
        }

        ToolRepository::new(self.pool)
            .update(
                id,
                ToolChanges {
                    name: update.name,
                    description: update.description,
                    url: update.url,
                    icon: update.icon,
                    category_id: update.category_id,
                    sort_order: update.sort_order,
                    is_active: update.is_active,
                },
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool", id))
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let deleted = ToolRepository::new(self.pool).delete(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Tool", id));
        }
        Ok(())
    }

    async fn require_category(&self, category_id: &str) -> ServiceResult<()> {
        ToolCategoryRepository::new(self.pool)
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool category", category_id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_pool;

    fn tool_request(name: &str) -> CreateTool {
        CreateTool {
            name: name.to_string(),
            description: None,
            url: Some("https://example.com".to_string()),
            icon: None,
            category_id: None,
            sort_order: None,
            is_active: None,
        }
    }

    async fn seed_category(pool: &SqlitePool) -> String {
        let category = ToolCategoryRepository::new(pool)
            .create("cat-1", "Converters", "converters", None, None, 0, true)
            .await
            .unwrap();
        category.id
    }

    #[tokio::test]
    async fn create_rejects_missing_category() {
        let pool = setup_pool().await;
        let service = ToolService::new(&pool);

        let mut request = tool_request("JSON formatter");
        request.category_id = Some("missing".to_string());

        let result = service.create(request).await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn create_rejects_invalid_url() {
        let pool = setup_pool().await;
        let service = ToolService::new(&pool);

        let mut request = tool_request("JSON formatter");
        request.url = Some("not a url".to_string());

        let result = service.create(request).await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn get_joins_category_name() {
        let pool = setup_pool().await;
        let service = ToolService::new(&pool);
        let category_id = seed_category(&pool).await;

        let mut request = tool_request("JSON formatter");
        request.category_id = Some(category_id);
        let created = service.create(request).await.unwrap();

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched.category_name.as_deref(), Some("Converters"));
    }

    #[tokio::test]
    async fn list_by_category_only_returns_active_tools() {
        let pool = setup_pool().await;
        let service = ToolService::new(&pool);
        let category_id = seed_category(&pool).await;

        let mut active = tool_request("JSON formatter");
        active.category_id = Some(category_id.clone());
        service.create(active).await.unwrap();

        let mut hidden = tool_request("Old tool");
        hidden.category_id = Some(category_id.clone());
        hidden.is_active = Some(false);
        service.create(hidden).await.unwrap();

        let tools = service.list_by_category(&category_id).await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "JSON formatter");
    }

    #[tokio::test]
    async fn update_missing_tool_is_not_found() {
        let pool = setup_pool().await;
        let service = ToolService::new(&pool);

        let result = service
            .update(
                "missing",
                UpdateTool {
                    name: Some("Renamed".to_string()),
                    description: None,
                    url: None,
                    icon: None,
                    category_id: None,
                    sort_order: None,
                    is_active: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }
}
