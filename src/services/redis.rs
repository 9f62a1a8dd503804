//! Redis service for read-through response caching

use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisService {
    client: Client,
    ttl_seconds: u64,
}

impl RedisService {
    /// Create a new Redis service
    pub async fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client, ttl_seconds })
    }

    /// Fetch a cached JSON value; misses and Redis failures both yield None
    pub async fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis unavailable, skipping cache read: {}", e);
                return None;
            }
        };

        let cached: Option<String> = match conn.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match cached {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => {
                    tracing::debug!("Cache hit for {}", key);
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!("Stale cache entry for {}: {}", key, e);
                    None
                }
            },
            None => {
                tracing::debug!("Cache miss for {}", key);
                None
            }
        }
    }

    /// Store a JSON value with the configured TTL; failures are logged only
    pub async fn cache_set<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry for {}: {}", key, e);
                return;
            }
        };

        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis unavailable, skipping cache write: {}", e);
                return;
            }
        };

        if let Err(e) = conn.set_ex::<_, _, ()>(key, json, self.ttl_seconds).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Drop all cache entries under a key prefix
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis unavailable, skipping cache invalidation: {}", e);
                return;
            }
        };

        let pattern = format!("{}*", prefix);
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Cache key scan failed for {}: {}", pattern, e);
                return;
            }
        };

        if keys.is_empty() {
            return;
        }

        if let Err(e) = conn.del::<_, ()>(keys).await {
            tracing::warn!("Cache invalidation failed for {}: {}", pattern, e);
        }
    }
}
