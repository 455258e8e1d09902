//! Comment business logic: submission and the moderation queue.

use crate::database::models::{CommentWithPost, CreateComment, PostComment, PublicUser};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::post_repository::PostRepository;
use crate::services::validation_messages;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct CommentService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Submits a comment as the authenticated user. The target post must be
    /// published; new comments wait in the moderation queue.
    pub async fn create(
        &self,
        user: &PublicUser,
        input: CreateComment,
    ) -> ServiceResult<PostComment> {
        if let Err(validation_errors) = input.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let post = PostRepository::new(self.pool)
            .get_by_id(&input.post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", &input.post_id))?;

        if !post.post.is_published {
            return Err(ServiceError::not_found("Post", &input.post_id));
        }

        let comment = CommentRepository::new(self.pool)
            .create(
                &Uuid::now_v7().to_string(),
                &input.post_id,
                Some(user.id.as_str()),
                &user.username,
                Some(user.email.as_str()),
                &input.content,
            )
            .await?;

        Ok(comment)
    }

    /// Moderation listing with optional post and approval filters.
    pub async fn list(
        &self,
        post_id: Option<&str>,
        is_approved: Option<bool>,
    ) -> ServiceResult<Vec<CommentWithPost>> {
        Ok(CommentRepository::new(self.pool)
            .list(post_id, is_approved)
            .await?)
    }

    pub async fn approve(&self, id: &str) -> ServiceResult<PostComment> {
        CommentRepository::new(self.pool)
            .approve(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", id))
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let deleted = CommentRepository::new(self.pool).delete(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Comment", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreatePost, CreateUser, UserRole};
    use crate::database::test_support::setup_pool;
    use crate::cache::SharedCache;
    use crate::cache::memory::MemoryCache;
    use crate::services::post_service::PostService;
    use crate::services::user_service::UserService;
    use std::sync::Arc;

    async fn seed_user(pool: &SqlitePool) -> PublicUser {
        let cache: SharedCache = Arc::new(MemoryCache::new());
        UserService::new(pool, cache)
            .create_user(
                CreateUser {
                    username: "reader".to_string(),
                    email: "reader@example.com".to_string(),
                    password: "password123".to_string(),
                },
                UserRole::User,
            )
            .await
            .unwrap()
    }

    async fn seed_post(pool: &SqlitePool, author_id: &str, published: bool) -> String {
        let detail = PostService::new(pool)
            .create(
                author_id,
                CreatePost {
                    title: "Post".to_string(),
                    slug: if published { "live" } else { "draft" }.to_string(),
                    excerpt: None,
                    content: "Body".to_string(),
                    cover_image: None,
                    is_published: Some(published),
                    tags: None,
                },
            )
            .await
            .unwrap();
        detail.post.post.id
    }

    #[tokio::test]
    async fn new_comments_start_unapproved() {
        let pool = setup_pool().await;
        let user = seed_user(&pool).await;
        let post_id = seed_post(&pool, &user.id, true).await;
        let service = CommentService::new(&pool);

        let comment = service
            .create(
                &user,
                CreateComment {
                    post_id: post_id.clone(),
                    content: "Nice write-up".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(!comment.is_approved);
        assert_eq!(comment.author, "reader");

        // Invisible on the public post until approved.
        let approved = CommentRepository::new(&pool)
            .approved_for_post(&post_id)
            .await
            .unwrap();
        assert!(approved.is_empty());

        service.approve(&comment.id).await.unwrap();
        let approved = CommentRepository::new(&pool)
            .approved_for_post(&post_id)
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
    }

    #[tokio::test]
    async fn commenting_on_a_draft_is_rejected() {
        let pool = setup_pool().await;
        let user = seed_user(&pool).await;
        let post_id = seed_post(&pool, &user.id, false).await;
        let service = CommentService::new(&pool);

        let result = service
            .create(
                &user,
                CreateComment {
                    post_id,
                    content: "First!".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn moderation_list_filters_by_approval() {
        let pool = setup_pool().await;
        let user = seed_user(&pool).await;
        let post_id = seed_post(&pool, &user.id, true).await;
        let service = CommentService::new(&pool);

        let first = service
            .create(
                &user,
                CreateComment {
                    post_id: post_id.clone(),
                    content: "one".to_string(),
                },
            )
            .await
            .unwrap();
        service
            .create(
                &user,
                CreateComment {
                    post_id: post_id.clone(),
                    content: "two".to_string(),
                },
            )
            .await
            .unwrap();

        service.approve(&first.id).await.unwrap();

        let pending = service.list(None, Some(false)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].comment.content, "two");

        let for_post = service.list(Some(&post_id), None).await.unwrap();
        assert_eq!(for_post.len(), 2);
        assert_eq!(for_post[0].post_title.as_deref(), Some("Post"));
    }
}
