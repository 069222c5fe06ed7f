// 缓存模块
// 挪车流程的全部临时状态都保存在这里，请求方与车主之间没有其他共享数据

pub mod clock;
pub mod keys;
pub mod models;
pub mod operations;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use clock::{Clock, SystemClock};
pub use models::{LocationRecord, NotifyStatus, PutOptions, StoredEntry};
pub use operations::NotifyCacheOperations;
pub use store::{JsonFileStore, KvStore, RedisStore};
