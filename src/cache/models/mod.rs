/// 缓存数据模型

// 存储条目
pub mod entry;

// 位置与状态记录
pub mod notify;

pub use entry::{PutOptions, StoredEntry};
pub use notify::{LocationRecord, NotifyStatus};
