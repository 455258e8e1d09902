//! User business logic service: the credential store.
//!
//! Owns password hashing and verification, uniqueness checks, and the
//! short-lived cached mirror of sanitized user records. The password hash is
//! only readable here; everything handed out is a `PublicUser`.

use crate::cache::{SharedCache, USER_CACHE_TTL_SECONDS, refresh_token_key, user_key};
use crate::database::models::{CreateUser, CreateUserRecord, PublicUser, UpdateUser, User, UserRole};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::{UserChanges, UserRepository};
use crate::services::validation_messages;
use bcrypt::{hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Bcrypt cost factor for stored password hashes.
const SALT_COST: u32 = 10;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    cache: SharedCache,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool, cache: SharedCache) -> Self {
        Self { pool, cache }
    }

    /// Creates a new user with full validation and uniqueness checks.
    ///
    /// # Errors
    /// Returns `ServiceError::AlreadyExists` when the email or username is
    /// taken, `ServiceError::Validation` for malformed input.
    pub async fn create_user(&self, create_user: CreateUser, role: UserRole) -> ServiceResult<PublicUser> {
        if let Err(validation_errors) = create_user.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = UserRepository::new(self.pool);

        if repo.email_exists(&create_user.email).await? {
            return Err(ServiceError::already_exists("Email", &create_user.email));
        }

        if repo.username_exists(&create_user.username).await? {
            return Err(ServiceError::already_exists(
                "Username",
                &create_user.username,
            ));
        }

        let password_hash = Self::hash_password(&create_user.password)?;

        let user = repo
            .create_user(CreateUserRecord {
                id: Uuid::now_v7().to_string(),
                email: create_user.email,
                username: create_user.username,
                password_hash,
                role,
            })
            .await?;

        let public: PublicUser = user.into();
        self.cache_user(&public).await;

        Ok(public)
    }

    /// Function to hash a password before storing in database
    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, SALT_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Verifies a plaintext password against a stored hash.
    pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<bool> {
        verify(password, password_hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }

    /// Full row lookup by email, hash included. Internal use only.
    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(UserRepository::new(self.pool).get_user_by_email(email).await?)
    }

    /// Full row lookup by username, hash included. Internal use only.
    pub async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(UserRepository::new(self.pool)
            .get_user_by_username(username)
            .await?)
    }

    /// Sanitized lookup by id, cache-first with store-on-miss.
    pub async fn find_public_by_id(&self, id: &str) -> ServiceResult<Option<PublicUser>> {
        if let Some(cached) = self.cache.get(&user_key(id)).await
            && let Ok(user) = serde_json::from_str::<PublicUser>(&cached)
        {
            return Ok(Some(user));
        }

        let user = UserRepository::new(self.pool).get_user_by_id(id).await?;
        match user {
            Some(user) => {
                let public: PublicUser = user.into();
                self.cache_user(&public).await;
                Ok(Some(public))
            }
            None => Ok(None),
        }
    }

    /// Sanitized lookup that fails with NotFound instead of returning None.
    pub async fn get_public_required(&self, id: &str) -> ServiceResult<PublicUser> {
        self.find_public_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<PublicUser>> {
        let users = UserRepository::new(self.pool).list_users().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Partial update; a present `password` field is re-hashed before storage.
    pub async fn update_user(&self, id: &str, update: UpdateUser) -> ServiceResult<PublicUser> {
        if let Err(validation_errors) = update.validate() {
            return Err(ServiceError::validation(validation_messages(
                validation_errors,
            )));
        }

        let repo = UserRepository::new(self.pool);

        if let Some(email) = &update.email
            && repo.email_exists_excluding(email, id).await?
        {
            return Err(ServiceError::already_exists("Email", email));
        }

        if let Some(username) = &update.username
            && repo.username_exists_excluding(username, id).await?
        {
            return Err(ServiceError::already_exists("Username", username));
        }

        let password_hash = match &update.password {
            Some(password) => Some(Self::hash_password(password)?),
            None => None,
        };

        let user = repo
            .update_user(
                id,
                UserChanges {
                    email: update.email,
                    username: update.username,
                    role: update.role,
                    is_active: update.is_active,
                    password_hash,
                },
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        let public: PublicUser = user.into();
        self.cache_user(&public).await;

        Ok(public)
    }

    /// Deletes a user and drops their cache entries (user mirror + session).
    pub async fn remove_user(&self, id: &str) -> ServiceResult<()> {
        let deleted = UserRepository::new(self.pool).delete_user(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("User", id));
        }

        self.cache.del(&user_key(id)).await;
        self.cache.del(&refresh_token_key(id)).await;

        Ok(())
    }

    /// Self-service password change; requires the current password.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        if !Self::verify_password(current_password, &user.password_hash)? {
            return Err(ServiceError::unauthorized("Current password is incorrect"));
        }

        if new_password.len() < 6 {
            return Err(ServiceError::validation(
                "Password must be at least 6 characters",
            ));
        }

        let password_hash = Self::hash_password(new_password)?;
        repo.update_user(
            user_id,
            UserChanges {
                password_hash: Some(password_hash),
                ..UserChanges::default()
            },
        )
        .await?;

        self.clear_user_cache(user_id).await;

        Ok(())
    }

    pub async fn clear_user_cache(&self, user_id: &str) {
        self.cache.del(&user_key(user_id)).await;
    }

    async fn cache_user(&self, user: &PublicUser) {
        if let Ok(serialized) = serde_json::to_string(user) {
            self.cache
                .set(&user_key(&user.id), &serialized, Some(USER_CACHE_TTL_SECONDS))
                .await;
        }
    }
}
