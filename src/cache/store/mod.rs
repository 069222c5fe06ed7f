use async_trait::async_trait;

use crate::cache::models::PutOptions;
use crate::error::StoreError;

mod file;
mod redis_store;

pub use file::JsonFileStore;
pub use redis_store::RedisStore;

/// 带过期时间的键值存储
///
/// 过期采用惰性删除：`get` 发现条目过期时顺带清除。
/// 因此 `None` 既可能是从未写入，也可能是已经过期，调用方无法区分。
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 读取失败（文件损坏、连接异常）时返回 `None`，不向上传递错误
    async fn get(&self, key: &str) -> Option<String>;

    /// 无条件覆盖已有值；`ttl_seconds` 为空时永不过期
    async fn put(&self, key: &str, value: &str, options: PutOptions) -> Result<(), StoreError>;
}
