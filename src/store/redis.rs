// src/store/redis.rs

//! Redis seen-store backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::error::{AppError, Result};
use crate::models::StoreConfig;
use crate::store::SeenStore;

/// Redis-backed seen store; expiry is delegated to `SETEX`.
pub struct RedisSeenStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisSeenStore {
    /// Connect to the configured Redis instance.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Client::open(config.redis_url.as_str()).map_err(AppError::store)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(AppError::store)?;

        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn key(&self, id: &str) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

#[async_trait]
impl SeenStore for RedisSeenStore {
    async fn exists(&self, id: &str) -> Result<bool> {
        // ConnectionManager multiplexes, so a clone per call is cheap
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(self.key(id)).await.map_err(AppError::store)?;
        Ok(exists)
    }

    async fn set_with_expiry(&self, id: &str, ttl: Duration, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let ttl_secs = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(self.key(id), value, ttl_secs)
            .await
            .map_err(AppError::store)?;
        Ok(())
    }
}
