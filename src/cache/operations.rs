//! 缓存操作
//! 在键值存储之上读写挪车流程的位置记录和通知状态

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::keys::{
    LOCATION_TTL_SECS, NOTIFY_STATUS_KEY, OWNER_LOCATION_KEY, REQUESTER_LOCATION_KEY,
    STATUS_TTL_SECS,
};
use crate::cache::models::{LocationRecord, NotifyStatus, PutOptions};
use crate::cache::store::KvStore;
use crate::error::StoreError;

/// 挪车流程缓存操作
pub struct NotifyCacheOperations;

impl NotifyCacheOperations {
    async fn put_json<T: Serialize>(
        store: &Arc<dyn KvStore>,
        key: &str,
        value: &T,
        ttl: u64,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        store.put(key, &json, PutOptions::ttl(ttl)).await
    }

    async fn get_json<T: DeserializeOwned>(store: &Arc<dyn KvStore>, key: &str) -> Option<T> {
        let json = store.get(key).await?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Failed to decode cached value for {}: {}", key, e);
                None
            }
        }
    }

    /// 缓存请求方位置
    pub async fn cache_requester_location(
        store: &Arc<dyn KvStore>,
        record: &LocationRecord,
    ) -> Result<(), StoreError> {
        Self::put_json(store, REQUESTER_LOCATION_KEY, record, LOCATION_TTL_SECS).await
    }

    /// 获取请求方位置
    pub async fn get_requester_location(store: &Arc<dyn KvStore>) -> Option<LocationRecord> {
        Self::get_json(store, REQUESTER_LOCATION_KEY).await
    }

    /// 缓存车主位置
    pub async fn cache_owner_location(
        store: &Arc<dyn KvStore>,
        record: &LocationRecord,
    ) -> Result<(), StoreError> {
        Self::put_json(store, OWNER_LOCATION_KEY, record, LOCATION_TTL_SECS).await
    }

    /// 获取车主位置
    pub async fn get_owner_location(store: &Arc<dyn KvStore>) -> Option<LocationRecord> {
        Self::get_json(store, OWNER_LOCATION_KEY).await
    }

    /// 设置通知状态
    pub async fn set_status(
        store: &Arc<dyn KvStore>,
        status: NotifyStatus,
    ) -> Result<(), StoreError> {
        store
            .put(
                NOTIFY_STATUS_KEY,
                status.as_str(),
                PutOptions::ttl(STATUS_TTL_SECS),
            )
            .await
    }

    /// 获取通知状态，不存在或已过期时为 waiting
    pub async fn get_status(store: &Arc<dyn KvStore>) -> NotifyStatus {
        store
            .get(NOTIFY_STATUS_KEY)
            .await
            .map(|value| NotifyStatus::from_stored(&value))
            .unwrap_or_default()
    }
}
