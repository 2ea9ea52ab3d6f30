//! Redis cache implementation.
//!
//! Values are stored as plain strings under their task key. TTLs map to
//! `SET EX`, and `DEL` takes several keys in one round trip.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;

use tasktrack_core::cache::{Cache, CacheError, Result};

use super::error::map_redis_error;
use crate::lifecycle::Shutdown;

/// Redis cache backend using connection manager for pooling.
///
/// The manager reconnects on its own after transient failures. Once
/// `shutdown` has run, every operation fails with `ConnectionFailed`.
pub struct RedisCache {
    conn: RwLock<Option<ConnectionManager>>,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;

        tracing::debug!(url, "Connected to Redis");
        Ok(Self {
            conn: RwLock::new(Some(conn)),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or_else(|| CacheError::ConnectionFailed("Redis client is closed".to_string()))
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.connection().await?;

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        conn.del::<_, ()>(keys.to_vec())
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}

#[async_trait]
impl Shutdown for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn shutdown(&self) -> anyhow::Result<()> {
        // Dropping the last manager clone closes the multiplexed connection.
        self.conn.write().await.take();
        Ok(())
    }
}
