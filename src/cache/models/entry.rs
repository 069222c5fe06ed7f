use serde::{Deserialize, Serialize};

/// 存储条目，落盘格式为 `{ "value": ..., "expireAt": 毫秒时间戳 | null }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    pub value: String,
    pub expire_at: Option<i64>,
}

/// 写入选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    pub ttl_seconds: Option<u64>,
}

impl PutOptions {
    pub fn ttl(seconds: u64) -> Self {
        Self {
            ttl_seconds: Some(seconds),
        }
    }
}

impl StoredEntry {
    pub fn new(value: impl Into<String>, options: PutOptions, now_millis: i64) -> Self {
        Self {
            value: value.into(),
            expire_at: options
                .ttl_seconds
                .map(|ttl| now_millis.saturating_add((ttl as i64).saturating_mul(1000))),
        }
    }

    /// 到达过期时间即视为不存在
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expire_at.is_some_and(|expire_at| now_millis >= expire_at)
    }
}
