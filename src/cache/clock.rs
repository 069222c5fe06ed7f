/// 过期判断使用的时间源（Unix 毫秒）
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        crate::utils::now_millis()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
