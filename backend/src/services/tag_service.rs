//! Tag business logic.

use crate::database::models::{CreateTag, Tag, TagDetail, TagWithCount, UpdateTag};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::tag_repository::{TagChanges, TagRepository};
use crate::services::validation_messages;
use crate::utils::slugify;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct TagService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TagService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a tag; the slug defaults to a slugified name.
    pub async fn create(&self, input: CreateTag) -> ServiceResult<Tag> {
        if let Err(validation_errors) = input.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = TagRepository::new(self.pool);
        let id = Uuid::now_v7().to_string();

        if repo.name_exists_excluding(&input.name, &id).await? {
            return Err(ServiceError::already_exists("Tag", &input.name));
        }

        let slug = input.slug.unwrap_or_else(|| slugify(&input.name));
        Ok(repo.create(&id, &input.name, &slug).await?)
    }

    /// Tag detail with the posts carrying it, for the public tag page.
    pub async fn get(&self, id: &str) -> ServiceResult<TagDetail> {
        let repo = TagRepository::new(self.pool);
        let tag = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tag", id))?;

        let posts = repo.posts_for_tag(&tag.id).await?;
        Ok(TagDetail { tag, posts })
    }

    pub async fn list(&self) -> ServiceResult<Vec<TagWithCount>> {
        Ok(TagRepository::new(self.pool).list_with_counts().await?)
    }

    pub async fn update(&self, id: &str, update: UpdateTag) -> ServiceResult<Tag> {
        if let Err(validation_errors) = update.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = TagRepository::new(self.pool);

        if let Some(name) = &update.name
            && repo.name_exists_excluding(name, id).await?
        {
            return Err(ServiceError::already_exists("Tag", name));
        }

        repo.update(
            id,
            TagChanges {
                name: update.name,
                slug: update.slug,
            },
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("Tag", id))
    }

    /// Deletes a tag; post links go with it via the cascade.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let deleted = TagRepository::new(self.pool).delete(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Tag", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_pool;

    #[tokio::test]
    async fn slug_defaults_to_slugified_name() {
        let pool = setup_pool().await;
        let service = TagService::new(&pool);

        let tag = service
            .create(CreateTag {
                name: "Web Dev".to_string(),
                slug: None,
            })
            .await
            .unwrap();

        assert_eq!(tag.slug, "web-dev");
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let pool = setup_pool().await;
        let service = TagService::new(&pool);

        service
            .create(CreateTag {
                name: "Rust".to_string(),
                slug: None,
            })
            .await
            .unwrap();

        let result = service
            .create(CreateTag {
                name: "Rust".to_string(),
                slug: Some("rust-2".to_string()),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn delete_missing_tag_is_not_found() {
        let pool = setup_pool().await;
        let service = TagService::new(&pool);

        assert!(matches!(
            service.delete("missing").await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
