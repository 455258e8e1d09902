//! Site settings business logic: a flat key/value store for site copy and
//! configuration the admin UI edits.

use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::setting_repository::SettingRepository;
use sqlx::SqlitePool;
use std::collections::HashMap;

pub struct SettingService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> ServiceResult<String> {
        let setting = SettingRepository::new(self.pool)
            .get(key)
            .await?
            .ok_or_else(|| ServiceError::not_found("Setting", key))?;

        Ok(setting.value)
    }

    /// All settings as a flat map, the shape the frontend consumes.
    pub async fn get_all(&self) -> ServiceResult<HashMap<String, String>> {
        let settings = SettingRepository::new(self.pool).list().await?;
        Ok(settings.into_iter().map(|s| (s.key, s.value)).collect())
    }

    /// Writes a batch of settings atomically. Empty keys are rejected.
    pub async fn set_many(&self, entries: HashMap<String, String>) -> ServiceResult<()> {
        if entries.keys().any(|k| k.trim().is_empty()) {
            return Err(ServiceError::validation("Setting keys must not be empty"));
        }

        let entries: Vec<(String, String)> = entries.into_iter().collect();
        SettingRepository::new(self.pool).upsert_many(&entries).await?;

        Ok(())
    }

    pub async fn set(&self, key: &str, value: &str) -> ServiceResult<()> {
        if key.trim().is_empty() {
            return Err(ServiceError::validation("Setting keys must not be empty"));
        }

        SettingRepository::new(self.pool).upsert(key, value).await?;
        Ok(())
    }
}
