//! Database repository for user management operations.
//!
//! Provides CRUD operations for system users. Full rows (including the
//! password hash) never leave the service layer.

use crate::database::models::{CreateUserRecord, User, UserRole};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, email, username, password_hash, role, is_active, created_at, updated_at";

/// Applied to an UPDATE; `None` fields keep their current value.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `record` - User record with the password already hashed
    ///
    /// # Returns
    /// The newly created User with all fields populated
    pub async fn create_user(&self, record: CreateUserRecord) -> Result<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, username, password_hash, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.username)
        .bind(&record.password_hash)
        .bind(record.role)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(user)
    }

    /// Retrieves a user by their email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(self.pool)
                .await?;

        Ok(user)
    }

    /// Retrieves a user by their username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, newest first.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Checks if an email already exists in the system.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Checks if a username already exists in the system.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Checks if another user already holds this email.
    pub async fn email_exists_excluding(&self, email: &str, exclude_user_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
                .bind(email)
                .bind(exclude_user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Checks if another user already holds this username.
    pub async fn username_exists_excluding(
        &self,
        username: &str,
        exclude_user_id: &str,
    ) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND id != ?")
                .bind(username)
                .bind(exclude_user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Partially updates a user. Absent fields keep their stored value.
    ///
    /// # Returns
    /// The updated User, or `None` if the id does not exist
    pub async fn update_user(&self, id: &str, changes: UserChanges) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE(?, email),
                username = COALESCE(?, username),
                role = COALESCE(?, role),
                is_active = COALESCE(?, is_active),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(changes.email)
        .bind(changes.username)
        .bind(changes.role)
        .bind(changes.is_active)
        .bind(changes.password_hash)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user. Refresh tokens are removed by the FK cascade.
    ///
    /// # Returns
    /// `true` if a row was deleted
    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
