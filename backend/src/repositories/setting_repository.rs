//! Database repository for site settings (key/value pairs).

use crate::database::models::SiteSetting;
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SettingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<SiteSetting>> {
        let setting = sqlx::query_as::<_, SiteSetting>(
            "SELECT key, value, updated_at FROM site_settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(setting)
    }

    pub async fn list(&self) -> Result<Vec<SiteSetting>> {
        let settings = sqlx::query_as::<_, SiteSetting>(
            "SELECT key, value, updated_at FROM site_settings ORDER BY key ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn upsert(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO site_settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Upserts a batch of settings inside one transaction.
    pub async fn upsert_many(&self, entries: &[(String, String)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO site_settings (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
