//! Tool category business logic.

use crate::database::models::{
    CreateToolCategory, ToolCategory, ToolCategoryStats, ToolCategoryWithCount, UpdateToolCategory,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::tool_category_repository::{ToolCategoryChanges, ToolCategoryRepository};
use crate::repositories::tool_repository::ToolRepository;
use crate::services::validation_messages;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct ToolCategoryService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ToolCategoryService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a category after checking name and slug uniqueness.
    pub async fn create(&self, input: CreateToolCategory) -> ServiceResult<ToolCategory> {
        if let Err(validation_errors) = input.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = ToolCategoryRepository::new(self.pool);
        let id = Uuid::now_v7().to_string();

        if repo.name_exists_excluding(&input.name, &id).await? {
            return Err(ServiceError::already_exists("Category name", &input.name));
        }
        if repo.slug_exists_excluding(&input.slug, &id).await? {
            return Err(ServiceError::already_exists("Category slug", &input.slug));
        }

        let category = repo
            .create(
                &id,
                &input.name,
                &input.slug,
                input.description.as_deref(),
                input.icon.as_deref(),
                input.sort_order.unwrap_or(0),
                input.is_active.unwrap_or(true),
            )
            .await?;

        Ok(category)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<ToolCategoryWithCount> {
        ToolCategoryRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool category", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<ToolCategoryWithCount> {
        ToolCategoryRepository::new(self.pool)
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool category", slug))
    }

    pub async fn list(&self, is_active: Option<bool>) -> ServiceResult<Vec<ToolCategoryWithCount>> {
        Ok(ToolCategoryRepository::new(self.pool).list(is_active).await?)
    }

    pub async fn update(&self, id: &str, update: UpdateToolCategory) -> ServiceResult<ToolCategory> {
        if let Err(validation_errors) = update.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = ToolCategoryRepository::new(self.pool);

        if let Some(name) = &update.name
            && repo.name_exists_excluding(name, id).await?
        {
            return Err(ServiceError::already_exists("Category name", name));
        }
        if let Some(slug) = &update.slug
            && repo.slug_exists_excluding(slug, id).await?
        {
            return Err(ServiceError::already_exists("Category slug", slug));
        }

        repo.update(
            id,
            ToolCategoryChanges {
                name: update.name,
                slug: update.slug,
                description: update.description,
                icon: update.icon,
                sort_order: update.sort_order,
                is_active: update.is_active,
            },
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("Tool category", id))
    }

    /// Deletes a category. Refused while tools still reference it.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let tool_count = ToolRepository::new(self.pool).count_in_category(id).await?;
        if tool_count > 0 {
            return Err(ServiceError::invalid_operation(format!(
                "Category still has {} tool(s); reassign or delete them first",
                tool_count
            )));
        }

        let deleted = ToolCategoryRepository::new(self.pool).delete(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Tool category", id));
        }

        Ok(())
    }

    pub async fn stats(&self) -> ServiceResult<ToolCategoryStats> {
        Ok(ToolCategoryRepository::new(self.pool).stats().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_pool;

    fn category_request(name: &str, slug: &str) -> CreateToolCategory {
        CreateToolCategory {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            icon: None,
            sort_order: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_by_slug() {
        let pool = setup_pool().await;
        let service = ToolCategoryService::new(&pool);

        let created = service
            .create(category_request("Converters", "converters"))
            .await
            .unwrap();
        assert!(created.is_active);
        assert_eq!(created.sort_order, 0);

        let fetched = service.get_by_slug("converters").await.unwrap();
        assert_eq!(fetched.category.id, created.id);
        assert_eq!(fetched.tool_count, 0);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let pool = setup_pool().await;
        let service = ToolCategoryService::new(&pool);

        service
            .create(category_request("Converters", "converters"))
            .await
            .unwrap();

        let result = service
            .create(category_request("Converters", "converters-2"))
            .await;
        assert!(matches!(result, Err(ServiceError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn delete_refuses_while_tools_remain() {
        let pool = setup_pool().await;
        let service = ToolCategoryService::new(&pool);

        let category = service
            .create(category_request("Converters", "converters"))
            .await
            .unwrap();

        ToolRepository::new(&pool)
            .create(
                "tool-1",
                "JSON formatter",
                None,
                None,
                None,
                Some(category.id.as_str()),
                0,
                true,
            )
            .await
            .unwrap();

        let blocked = service.delete(&category.id).await;
        assert!(matches!(blocked, Err(ServiceError::InvalidOperation { .. })));

        ToolRepository::new(&pool).delete("tool-1").await.unwrap();
        service.delete(&category.id).await.unwrap();

        assert!(matches!(
            service.get(&category.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn stats_split_active_and_inactive() {
        let pool = setup_pool().await;
        let service = ToolCategoryService::new(&pool);

        service
            .create(category_request("Converters", "converters"))
            .await
            .unwrap();
        let mut inactive = category_request("Archived", "archived");
        inactive.is_active = Some(false);
        service.create(inactive).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.inactive, 1);
    }
}
