use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{
    Clock, KvStore, LocationRecord, NotifyCacheOperations, NotifyStatus, SystemClock,
};
use crate::common::LocationInput;
use crate::error::AppError;
use crate::infrastructure::push::{self, ALERT_TITLE, PushAlert, PushGateway};

/// 请求方未填写留言时的默认内容
pub const DEFAULT_MESSAGE: &str = "车旁有人等待";

/// 车主确认页路径
pub const OWNER_CONFIRM_PATH: &str = "/owner-confirm";

// 区分字段缺失（None）与显式 null（Some(None)）
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct NotifyRequest {
    /// 缺失时使用默认留言，显式 null 表示不附带留言
    #[serde(default, deserialize_with = "explicit_null")]
    pub message: Option<Option<String>>,
    #[serde(default)]
    pub location: Option<LocationInput>,
    #[serde(default)]
    pub delayed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnerConfirmRequest {
    #[serde(default)]
    pub location: Option<LocationInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: NotifyStatus,
    #[serde(rename = "ownerLocation")]
    pub owner_location: Option<LocationRecord>,
}

/// 组装推送正文
pub fn format_alert_body(message: &str, has_location: bool) -> String {
    let mut body = String::from("🚗 挪车请求");
    if !message.is_empty() {
        body.push_str(&format!("\n💬 留言: {}", message));
    }
    if has_location {
        body.push_str("\n📍 已附带位置信息，点击查看");
    } else {
        body.push_str("\n⚠️ 未提供位置信息");
    }
    body
}

/// 挪车流程协调器
///
/// 自身不保存会话状态，每次调用都重新读取存储。
#[derive(Clone)]
pub struct NotifyCoordinator {
    store: Arc<dyn KvStore>,
    gateway: Arc<dyn PushGateway>,
    clock: Arc<dyn Clock>,
    delay: Duration,
}

impl NotifyCoordinator {
    pub fn new(store: Arc<dyn KvStore>, gateway: Arc<dyn PushGateway>, delay: Duration) -> Self {
        Self::with_clock(store, gateway, delay, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn KvStore>,
        gateway: Arc<dyn PushGateway>,
        delay: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            delay,
        }
    }

    /// 请求方发起通知
    ///
    /// 写入存储失败时返回错误；推送在后台进行，失败只记录日志。
    pub async fn submit_notify(&self, req: NotifyRequest, origin: &str) -> Result<(), AppError> {
        let message = match req.message {
            None => DEFAULT_MESSAGE.to_string(),
            Some(message) => message.unwrap_or_default(),
        };
        let location = req.location.and_then(LocationInput::to_coordinate);

        if let Some(coord) = location {
            let record = LocationRecord::requester(coord);
            NotifyCacheOperations::cache_requester_location(&self.store, &record).await?;
        } else {
            tracing::debug!("Notify request without location");
        }

        NotifyCacheOperations::set_status(&self.store, NotifyStatus::Waiting).await?;
        tracing::info!(
            "Notify accepted, has_location: {}, delayed: {}",
            location.is_some(),
            req.delayed.unwrap_or(false)
        );

        // 只挂起当前请求，不影响其他请求
        if req.delayed.unwrap_or(false) {
            tokio::time::sleep(self.delay).await;
        }

        let alert = PushAlert {
            title: ALERT_TITLE.to_string(),
            body: format_alert_body(&message, location.is_some()),
            callback_url: format!("{}{}", origin, OWNER_CONFIRM_PATH),
        };
        push::dispatch(self.gateway.clone(), alert);

        Ok(())
    }

    pub async fn get_requester_location(&self) -> Option<LocationRecord> {
        NotifyCacheOperations::get_requester_location(&self.store).await
    }

    /// 车主确认，任何失败都只记录日志，确认状态总会尝试写入
    pub async fn confirm_by_owner(&self, req: OwnerConfirmRequest) {
        if let Some(coord) = req.location.and_then(LocationInput::to_coordinate) {
            let record = LocationRecord::owner(coord, self.clock.now_millis());
            if let Err(e) = NotifyCacheOperations::cache_owner_location(&self.store, &record).await
            {
                tracing::warn!("Failed to store owner location: {}", e);
            }
        }

        match NotifyCacheOperations::set_status(&self.store, NotifyStatus::Confirmed).await {
            Ok(()) => tracing::info!("Owner confirmed"),
            Err(e) => tracing::error!("Failed to store confirmation: {}", e),
        }
    }

    pub async fn check_status(&self) -> StatusResponse {
        StatusResponse {
            status: NotifyCacheOperations::get_status(&self.store).await,
            owner_location: NotifyCacheOperations::get_owner_location(&self.store).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::keys::{NOTIFY_STATUS_KEY, STATUS_TTL_SECS};
    use crate::cache::{JsonFileStore, PutOptions};
    use crate::error::{PushError, StoreError};

    struct RecordingGateway(mpsc::UnboundedSender<PushAlert>);

    #[async_trait]
    impl PushGateway for RecordingGateway {
        async fn push(&self, alert: &PushAlert) -> Result<(), PushError> {
            let _ = self.0.send(alert.clone());
            Ok(())
        }
    }

    /// 读取永远为空、写入永远失败的存储
    struct BrokenStore;

    #[async_trait]
    impl KvStore for BrokenStore {
        async fn get(&self, _key: &str) -> Option<String> {
            None
        }

        async fn put(&self, _key: &str, _value: &str, _options: PutOptions) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    struct Fixture {
        coordinator: NotifyCoordinator,
        clock: Arc<ManualClock>,
        alerts: mpsc::UnboundedReceiver<PushAlert>,
        _dir: tempfile::TempDir,
    }

    async fn fixture(delay: Duration) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = JsonFileStore::open_with_clock(dir.path().join("store.json"), clock.clone())
            .await
            .unwrap();
        let (tx, alerts) = mpsc::unbounded_channel();
        let coordinator = NotifyCoordinator::with_clock(
            Arc::new(store),
            Arc::new(RecordingGateway(tx)),
            delay,
            clock.clone(),
        );
        Fixture {
            coordinator,
            clock,
            alerts,
            _dir: dir,
        }
    }

    fn location(lat: f64, lng: f64) -> Option<LocationInput> {
        Some(LocationInput {
            lat: Some(lat),
            lng: Some(lng),
        })
    }

    #[test]
    fn alert_body_lists_message_and_location_hint() {
        assert_eq!(
            format_alert_body("快来", true),
            "🚗 挪车请求\n💬 留言: 快来\n📍 已附带位置信息，点击查看"
        );
        assert_eq!(format_alert_body("", false), "🚗 挪车请求\n⚠️ 未提供位置信息");
    }

    #[tokio::test]
    async fn notify_without_location_sets_waiting_and_pushes() {
        let mut f = fixture(Duration::ZERO).await;

        f.coordinator
            .submit_notify(
                NotifyRequest {
                    message: Some(Some("x".to_string())),
                    ..Default::default()
                },
                "http://car.example.com",
            )
            .await
            .unwrap();

        let status = f.coordinator.check_status().await;
        assert_eq!(status.status, NotifyStatus::Waiting);
        assert!(status.owner_location.is_none());
        assert!(f.coordinator.get_requester_location().await.is_none());

        let alert = f.alerts.recv().await.unwrap();
        assert_eq!(alert.title, ALERT_TITLE);
        assert_eq!(alert.body, "🚗 挪车请求\n💬 留言: x\n⚠️ 未提供位置信息");
        assert_eq!(alert.callback_url, "http://car.example.com/owner-confirm");
    }

    #[test]
    fn missing_and_null_message_are_distinguished() {
        let missing: NotifyRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.message, None);

        let null: NotifyRequest = serde_json::from_str(r#"{"message":null}"#).unwrap();
        assert_eq!(null.message, Some(None));

        let text: NotifyRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(text.message, Some(Some("hi".to_string())));
    }

    #[tokio::test]
    async fn null_message_sends_alert_without_message_line() {
        let mut f = fixture(Duration::ZERO).await;

        let req: NotifyRequest = serde_json::from_str(r#"{"message":null}"#).unwrap();
        f.coordinator
            .submit_notify(req, "http://localhost")
            .await
            .unwrap();

        let alert = f.alerts.recv().await.unwrap();
        assert_eq!(alert.body, "🚗 挪车请求\n⚠️ 未提供位置信息");
    }

    #[tokio::test]
    async fn notify_with_location_stores_requester_record() {
        let mut f = fixture(Duration::ZERO).await;

        f.coordinator
            .submit_notify(
                NotifyRequest {
                    location: location(39.9, 116.4),
                    ..Default::default()
                },
                "http://localhost",
            )
            .await
            .unwrap();

        let record = f.coordinator.get_requester_location().await.unwrap();
        assert_eq!((record.lat, record.lng), (39.9, 116.4));
        assert!(record.urls.amap_url.contains("position=116.406"));
        assert!(record.timestamp.is_none());

        let alert = f.alerts.recv().await.unwrap();
        assert!(alert.body.contains(DEFAULT_MESSAGE));
        assert!(alert.body.contains("已附带位置信息"));
    }

    #[tokio::test]
    async fn notify_fails_when_store_write_fails() {
        let (tx, mut alerts) = mpsc::unbounded_channel();
        let coordinator = NotifyCoordinator::new(
            Arc::new(BrokenStore),
            Arc::new(RecordingGateway(tx)),
            Duration::ZERO,
        );

        let result = coordinator
            .submit_notify(NotifyRequest::default(), "http://localhost")
            .await;
        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(alerts.try_recv().is_err());
    }

    #[tokio::test]
    async fn delayed_notify_waits_before_pushing() {
        let mut f = fixture(Duration::from_millis(100)).await;

        let started = std::time::Instant::now();
        f.coordinator
            .submit_notify(
                NotifyRequest {
                    delayed: Some(true),
                    ..Default::default()
                },
                "http://localhost",
            )
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert!(f.alerts.recv().await.is_some());
    }

    #[tokio::test]
    async fn delayed_notify_does_not_block_other_calls() {
        let f = fixture(Duration::from_secs(60)).await;

        let pending = {
            let coordinator = f.coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .submit_notify(
                        NotifyRequest {
                            delayed: Some(true),
                            ..Default::default()
                        },
                        "http://localhost",
                    )
                    .await
            })
        };

        // 等待后台任务写入 waiting 状态
        for _ in 0..100 {
            if f.coordinator.store.get(NOTIFY_STATUS_KEY).await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(f.coordinator.check_status().await.status, NotifyStatus::Waiting);

        f.coordinator
            .confirm_by_owner(OwnerConfirmRequest::default())
            .await;
        assert_eq!(f.coordinator.check_status().await.status, NotifyStatus::Confirmed);

        assert!(!pending.is_finished());
        pending.abort();
    }

    #[tokio::test]
    async fn confirm_with_location_records_owner_and_timestamp() {
        let f = fixture(Duration::ZERO).await;

        f.coordinator
            .confirm_by_owner(OwnerConfirmRequest {
                location: location(31.2304, 121.4737),
            })
            .await;

        let status = f.coordinator.check_status().await;
        assert_eq!(status.status, NotifyStatus::Confirmed);
        let owner = status.owner_location.unwrap();
        assert_eq!(owner.timestamp, Some(1_700_000_000_000));
        assert!(owner.urls.apple_url.contains("ll=31.228"));
    }

    #[tokio::test]
    async fn confirm_is_idempotent() {
        let f = fixture(Duration::ZERO).await;

        for _ in 0..2 {
            f.coordinator
                .confirm_by_owner(OwnerConfirmRequest::default())
                .await;
            let status = f.coordinator.check_status().await;
            assert_eq!(status.status, NotifyStatus::Confirmed);
            assert!(status.owner_location.is_none());
        }
    }

    #[tokio::test]
    async fn confirm_never_fails_even_when_store_is_broken() {
        let (tx, _alerts) = mpsc::unbounded_channel();
        let coordinator = NotifyCoordinator::new(
            Arc::new(BrokenStore),
            Arc::new(RecordingGateway(tx)),
            Duration::ZERO,
        );

        coordinator
            .confirm_by_owner(OwnerConfirmRequest {
                location: location(39.9, 116.4),
            })
            .await;
        assert_eq!(coordinator.check_status().await.status, NotifyStatus::Waiting);
    }

    #[tokio::test]
    async fn status_falls_back_to_waiting_after_ttl() {
        let mut f = fixture(Duration::ZERO).await;

        f.coordinator
            .submit_notify(NotifyRequest::default(), "http://localhost")
            .await
            .unwrap();
        f.coordinator
            .confirm_by_owner(OwnerConfirmRequest::default())
            .await;
        assert_eq!(f.coordinator.check_status().await.status, NotifyStatus::Confirmed);

        f.clock.advance(Duration::from_secs(STATUS_TTL_SECS));
        assert_eq!(f.coordinator.check_status().await.status, NotifyStatus::Waiting);
        assert!(f.alerts.recv().await.is_some());
    }
}
