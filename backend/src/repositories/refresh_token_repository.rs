//! Database repository for persistent refresh-token records.
//!
//! Rows are written on login/refresh and bulk-deleted on logout. Stale rows
//! superseded by rotation may linger until the owning user logs out or is
//! deleted; refresh-time validity is decided against the session cache.

use crate::database::models::RefreshTokenRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct RefreshTokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RefreshTokenRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a newly issued refresh token.
    pub async fn create(
        &self,
        token: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            INSERT INTO refresh_tokens (token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING token, user_id, expires_at, created_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes every refresh-token row belonging to a user.
    ///
    /// # Returns
    /// Number of rows removed (zero is fine; logout is idempotent)
    pub async fn delete_by_user(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Number of live rows for a user. Used by tests and cleanup tooling.
    pub async fn count_for_user(&self, user_id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}
