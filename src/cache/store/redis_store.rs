use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::KvStore;
use crate::cache::models::PutOptions;
use crate::error::StoreError;

/// 键前缀，避免与同一 Redis 实例中的其他数据冲突
const KEY_PREFIX: &str = "movecar:";

/// Redis 存储，过期交给 Redis 自身的 EXPIRE 处理
#[derive(Clone)]
pub struct RedisStore {
    redis: Arc<RedisClient>,
}

impl RedisStore {
    pub fn new(redis: RedisClient) -> Self {
        Self {
            redis: Arc::new(redis),
        }
    }

    pub fn open(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(RedisClient::open(redis_url)?))
    }

    fn key(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = match self.redis.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}", e);
                return None;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(Self::key(key)).await;
        result.unwrap_or_else(|e| {
            tracing::warn!("Failed to read key {} from Redis: {}", key, e);
            None
        })
    }

    async fn put(&self, key: &str, value: &str, options: PutOptions) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        match options.ttl_seconds {
            Some(ttl) => {
                let _: () = conn.set_ex(Self::key(key), value, ttl).await?;
            }
            None => {
                let _: () = conn.set(Self::key(key), value).await?;
            }
        }

        Ok(())
    }
}
