//! Best-effort key-value cache for sessions and user projections.
//!
//! The cache holds the active refresh token per user (`refresh_token:<id>`)
//! and a short-lived mirror of sanitized user records (`user:<id>`). It is an
//! availability optimization over the database, never the source of truth for
//! user data, so every operation degrades to a cache miss instead of failing:
//! a dead cache must never block login, refresh, or logout.

use crate::config::Config;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use std::sync::Arc;
use std::time::Duration;

/// Refresh-token lifetime, shared by the token issuer and the cache TTL.
pub const REFRESH_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// TTL for cached sanitized user records, independent of the session TTL.
pub const USER_CACHE_TTL_SECONDS: u64 = 3600;

/// Backoff cap for cache reconnect attempts.
const MAX_RECONNECT_DELAY_MS: u64 = 500;

pub fn refresh_token_key(user_id: &str) -> String {
    format!("refresh_token:{}", user_id)
}

pub fn user_key(user_id: &str) -> String {
    format!("user:{}", user_id)
}

/// Cache capability consumed by the auth and user services.
///
/// Implementations never surface connectivity errors: `get` returns `None`,
/// `exists` returns `false`, and writes are silently dropped when the backing
/// store is unreachable.
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>);
    async fn del(&self, key: &str);
    async fn exists(&self, key: &str) -> bool;
}

pub type SharedCache = Arc<dyn SessionCache>;

/// Selects the cache implementation from configuration.
///
/// Falls back to the no-op cache when the cache is disabled or the initial
/// connection fails; the server keeps running against the database alone.
pub async fn connect(config: &Config) -> SharedCache {
    if !config.redis_enabled {
        tracing::info!("Cache is disabled (REDIS_ENABLED=false)");
        return Arc::new(NoopCache);
    }

    match RedisCache::connect(&config.redis_url()).await {
        Ok(cache) => {
            tracing::info!(
                "Cache connected at {}:{}",
                config.redis_host,
                config.redis_port
            );
            Arc::new(cache)
        }
        Err(err) => {
            tracing::warn!("Cache unavailable, continuing without it: {}", err);
            Arc::new(NoopCache)
        }
    }
}

/// Redis-backed cache client with automatic reconnection.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_max_delay(MAX_RECONNECT_DELAY_MS)
            .set_connection_timeout(Duration::from_secs(2));
        let manager = ConnectionManager::new_with_config(client, config).await?;
        Ok(RedisCache { manager })
    }
}

#[async_trait]
impl SessionCache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut con = self.manager.clone();
        match con.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("Cache get error for {}: {}", key, err);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) {
        let mut con = self.manager.clone();
        let result = match ttl_seconds {
            Some(ttl) => con.set_ex::<_, _, ()>(key, value, ttl).await,
            None => con.set::<_, _, ()>(key, value).await,
        };
        if let Err(err) = result {
            tracing::error!("Cache set error for {}: {}", key, err);
        }
    }

    async fn del(&self, key: &str) {
        let mut con = self.manager.clone();
        if let Err(err) = con.del::<_, ()>(key).await {
            tracing::error!("Cache del error for {}: {}", key, err);
        }
    }

    async fn exists(&self, key: &str) -> bool {
        let mut con = self.manager.clone();
        match con.exists::<_, bool>(key).await {
            Ok(found) => found,
            Err(err) => {
                tracing::error!("Cache exists error for {}: {}", key, err);
                false
            }
        }
    }
}

/// Fallback used when caching is disabled or unreachable at startup.
/// Everything is a miss; the database serves every lookup.
pub struct NoopCache;

#[async_trait]
impl SessionCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: Option<u64>) {}

    async fn del(&self, _key: &str) {}

    async fn exists(&self, _key: &str) -> bool {
        false
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_cache_never_stores() {
        let cache = NoopCache;
        cache.set("k", "v", Some(60)).await;
        assert_eq!(cache.get("k").await, None);
        assert!(!cache.exists("k").await);
        cache.del("k").await;
    }

    #[test]
    fn key_namespaces() {
        assert_eq!(refresh_token_key("u1"), "refresh_token:u1");
        assert_eq!(user_key("u1"), "user:u1");
    }
}
