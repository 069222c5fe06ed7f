/// 缓存键与过期时间
/// 系统只服务一辆车，所以键都是固定值

/// 请求方位置
pub const REQUESTER_LOCATION_KEY: &str = "requester_location";

/// 车主位置
pub const OWNER_LOCATION_KEY: &str = "owner_location";

/// 通知状态
pub const NOTIFY_STATUS_KEY: &str = "notify_status";

/// 位置记录过期时间，单位秒
pub const LOCATION_TTL_SECS: u64 = 3600;

/// 通知状态过期时间，单位秒。过期后状态自动回到 waiting
pub const STATUS_TTL_SECS: u64 = 600;
