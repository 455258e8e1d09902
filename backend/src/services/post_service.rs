//! Blog post business logic.
//!
//! Slug uniqueness, the publish lifecycle, tag attachment by name, and the
//! public read path (view counting, approved comments only) all live here.

use crate::database::models::{
    CreatePost, Post, PostDetail, PostListItem, PostStatus, PostWithAuthor, UpdatePost,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::post_repository::{PostChanges, PostRepository};
use crate::repositories::tag_repository::TagRepository;
use crate::services::validation_messages;
use crate::utils::slugify;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct PostService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a post for the given author. Publishing at creation time sets
    /// `published_at` immediately.
    pub async fn create(&self, author_id: &str, input: CreatePost) -> ServiceResult<PostDetail> {
        if let Err(validation_errors) = input.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = PostRepository::new(self.pool);
        let id = Uuid::now_v7().to_string();

        if repo.slug_exists_excluding(&input.slug, &id).await? {
            return Err(ServiceError::already_exists("Post slug", &input.slug));
        }

        let is_published = input.is_published.unwrap_or(false);
        let (status, published_at) = if is_published {
            (PostStatus::Published, Some(Utc::now()))
        } else {
            (PostStatus::Draft, None)
        };

        let post = repo
            .create(
                &id,
                &input.title,
                &input.slug,
                input.excerpt.as_deref(),
                &input.content,
                input.cover_image.as_deref(),
                status,
                is_published,
                author_id,
                published_at,
            )
            .await?;

        if let Some(tags) = &input.tags {
            self.attach_tags(&post.id, tags).await?;
        }

        self.detail_for(&post.id).await
    }

    /// Admin view of a post by id, drafts included.
    pub async fn get(&self, id: &str) -> ServiceResult<PostDetail> {
        self.detail_for(id).await
    }

    /// Public read by slug. Only published posts are visible; every hit bumps
    /// the view counter.
    pub async fn read_published(&self, slug: &str) -> ServiceResult<PostDetail> {
        let repo = PostRepository::new(self.pool);
        let post = repo
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", slug))?;

        if !post.post.is_published {
            return Err(ServiceError::not_found("Post", slug));
        }

        repo.increment_view_count(&post.post.id).await?;
        self.detail_for(&post.post.id).await
    }

    /// Published posts for the public listing, newest first, with tags.
    pub async fn list_published(
        &self,
        limit: u64,
        offset: u64,
    ) -> ServiceResult<(Vec<PostListItem>, u64)> {
        let repo = PostRepository::new(self.pool);
        let posts = repo.list_published(limit, offset).await?;
        let total = repo.count_published().await?;

        let items = self.with_tags(posts).await?;
        Ok((items, total))
    }

    /// Admin listing across all posts with optional status filters.
    pub async fn list_all(
        &self,
        status: Option<PostStatus>,
        is_published: Option<bool>,
    ) -> ServiceResult<Vec<PostListItem>> {
        let posts = PostRepository::new(self.pool)
            .list_all(status, is_published)
            .await?;
        self.with_tags(posts).await
    }

    /// Partial update. Publishing a draft stamps `published_at`; unpublishing
    /// keeps the timestamp but reverts the status to draft.
    pub async fn update(&self, id: &str, update: UpdatePost) -> ServiceResult<PostDetail> {
        if let Err(validation_errors) = update.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = PostRepository::new(self.pool);
        let existing = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", id))?;

        if let Some(slug) = &update.slug
            && repo.slug_exists_excluding(slug, id).await?
        {
            return Err(ServiceError::already_exists("Post slug", slug));
        }

        let (status, published_at) = match update.is_published {
            Some(true) if !existing.post.is_published => {
                (Some(PostStatus::Published), Some(Utc::now()))
            }
            Some(true) => (Some(PostStatus::Published), None),
            Some(false) => (Some(PostStatus::Draft), None),
            None => (None, None),
        };

        repo.update(
            id,
            PostChanges {
                title: update.title,
                slug: update.slug,
                excerpt: update.excerpt,
                content: update.content,
                cover_image: update.cover_image,
                status,
                is_published: update.is_published,
                published_at,
            },
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("Post", id))?;

        if let Some(tags) = &update.tags {
            TagRepository::new(self.pool).clear_post_tags(id).await?;
            self.attach_tags(id, tags).await?;
        }

        self.detail_for(id).await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let deleted = PostRepository::new(self.pool).delete(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Post", id));
        }
        Ok(())
    }

    /// Bumps the like counter on a published post.
    pub async fn like(&self, id: &str) -> ServiceResult<Post> {
        let post = PostRepository::new(self.pool)
            .increment_like_count(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", id))?;

        if !post.is_published {
            return Err(ServiceError::not_found("Post", id));
        }

        Ok(post)
    }

    /// Resolves tag names to rows, creating missing tags with a derived slug.
    async fn attach_tags(&self, post_id: &str, tag_names: &[String]) -> ServiceResult<()> {
        let tags = TagRepository::new(self.pool);
        for name in tag_names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let tag = match tags.get_by_name(name).await? {
                Some(tag) => tag,
                None => {
                    tags.create(&Uuid::now_v7().to_string(), name, &slugify(name))
                        .await?
                }
            };
            tags.link_post(post_id, &tag.id).await?;
        }

        Ok(())
    }

    async fn detail_for(&self, id: &str) -> ServiceResult<PostDetail> {
        let post = PostRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", id))?;

        let tags = TagRepository::new(self.pool).tags_for_post(id).await?;
        let comments = CommentRepository::new(self.pool)
            .approved_for_post(id)
            .await?;

        Ok(PostDetail {
            post,
            tags,
            comments,
        })
    }

    async fn with_tags(&self, posts: Vec<PostWithAuthor>) -> ServiceResult<Vec<PostListItem>> {
        let tags = TagRepository::new(self.pool);
        let mut items = Vec::with_capacity(posts.len());
        for post in posts {
            let post_tags = tags.tags_for_post(&post.post.id).await?;
            items.push(PostListItem {
                post,
                tags: post_tags,
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreateUserRecord, UserRole};
    use crate::database::test_support::setup_pool;
    use crate::repositories::user_repository::UserRepository;

    async fn seed_author(pool: &SqlitePool) -> String {
        let user = UserRepository::new(pool)
            .create_user(CreateUserRecord {
                id: "author-1".to_string(),
                email: "author@example.com".to_string(),
                username: "author".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        user.id
    }

    fn post_request(title: &str, slug: &str) -> CreatePost {
        CreatePost {
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: None,
            content: "Body text".to_string(),
            cover_image: None,
            is_published: None,
            tags: None,
        }
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_the_public_read_path() {
        let pool = setup_pool().await;
        let author = seed_author(&pool).await;
        let service = PostService::new(&pool);

        service
            .create(&author, post_request("Draft post", "draft-post"))
            .await
            .unwrap();

        let result = service.read_published("draft-post").await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn publishing_at_creation_sets_published_at() {
        let pool = setup_pool().await;
        let author = seed_author(&pool).await;
        let service = PostService::new(&pool);

        let mut request = post_request("Live post", "live-post");
        request.is_published = Some(true);
        let created = service.create(&author, request).await.unwrap();

        assert_eq!(created.post.post.status, PostStatus::Published);
        assert!(created.post.post.published_at.is_some());
    }

    #[tokio::test]
    async fn reading_a_published_post_increments_views() {
        let pool = setup_pool().await;
        let author = seed_author(&pool).await;
        let service = PostService::new(&pool);

        let mut request = post_request("Live post", "live-post");
        request.is_published = Some(true);
        service.create(&author, request).await.unwrap();

        service.read_published("live-post").await.unwrap();
        let detail = service.read_published("live-post").await.unwrap();

        // The second read sees the first read's bump plus its own.
        assert_eq!(detail.post.post.view_count, 2);
    }

    #[tokio::test]
    async fn tags_are_created_on_the_fly_and_reused() {
        let pool = setup_pool().await;
        let author = seed_author(&pool).await;
        let service = PostService::new(&pool);

        let mut first = post_request("First", "first");
        first.tags = Some(vec!["Rust".to_string(), "Web Dev".to_string()]);
        let created = service.create(&author, first).await.unwrap();

        assert_eq!(created.tags.len(), 2);
        assert!(created.tags.iter().any(|t| t.slug == "web-dev"));

        let mut second = post_request("Second", "second");
        second.tags = Some(vec!["Rust".to_string()]);
        service.create(&author, second).await.unwrap();

        // "Rust" is shared, not duplicated.
        let all_tags = TagRepository::new(&pool).list_with_counts().await.unwrap();
        assert_eq!(all_tags.len(), 2);
        let rust = all_tags.iter().find(|t| t.tag.name == "Rust").unwrap();
        assert_eq!(rust.post_count, 2);
    }

    #[tokio::test]
    async fn update_with_empty_tag_list_clears_tags() {
        let pool = setup_pool().await;
        let author = seed_author(&pool).await;
        let service = PostService::new(&pool);

        let mut request = post_request("Tagged", "tagged");
        request.tags = Some(vec!["Rust".to_string()]);
        let created = service.create(&author, request).await.unwrap();

        let updated = service
            .update(
                &created.post.post.id,
                UpdatePost {
                    title: None,
                    slug: None,
                    excerpt: None,
                    content: None,
                    cover_image: None,
                    is_published: None,
                    tags: Some(vec![]),
                },
            )
            .await
            .unwrap();

        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn unpublishing_reverts_to_draft_but_keeps_published_at() {
        let pool = setup_pool().await;
        let author = seed_author(&pool).await;
        let service = PostService::new(&pool);

        let mut request = post_request("Live post", "live-post");
        request.is_published = Some(true);
        let created = service.create(&author, request).await.unwrap();
        let first_published_at = created.post.post.published_at;

        let unpublished = service
            .update(
                &created.post.post.id,
                UpdatePost {
                    title: None,
                    slug: None,
                    excerpt: None,
                    content: None,
                    cover_image: None,
                    is_published: Some(false),
                    tags: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(unpublished.post.post.status, PostStatus::Draft);
        assert!(!unpublished.post.post.is_published);
        assert_eq!(unpublished.post.post.published_at, first_published_at);
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let pool = setup_pool().await;
        let author = seed_author(&pool).await;
        let service = PostService::new(&pool);

        service
            .create(&author, post_request("First", "same-slug"))
            .await
            .unwrap();

        let result = service
            .create(&author, post_request("Second", "same-slug"))
            .await;
        assert!(matches!(result, Err(ServiceError::AlreadyExists { .. })));
    }
}
