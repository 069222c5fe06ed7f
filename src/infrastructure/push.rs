//! 推送网关（Bark）
//!
//! 推送是尽力而为的旁路：在独立任务里发送，失败只记录日志，
//! 不会影响通知请求本身的结果。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::task::JoinHandle;

use crate::error::PushError;

/// 与 JavaScript encodeURIComponent 一致的编码集合
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PUSH_GROUP: &str = "MoveCar";
const PUSH_LEVEL: &str = "critical";
const PUSH_SOUND: &str = "minuet";
const PUSH_ICON: &str = "https://cdn-icons-png.flaticon.com/512/741/741407.png";
const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// 推送通知标题
pub const ALERT_TITLE: &str = "挪车请求";

#[derive(Debug, Clone, PartialEq)]
pub struct PushAlert {
    pub title: String,
    pub body: String,
    /// 车主点击通知后打开的确认页
    pub callback_url: String,
}

#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn push(&self, alert: &PushAlert) -> Result<(), PushError>;
}

fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

pub struct BarkGateway {
    client: reqwest::Client,
    base_url: String,
}

impl BarkGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().timeout(PUSH_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn push_url(&self, alert: &PushAlert) -> String {
        format!(
            "{}/{}/{}?group={}&level={}&call=1&sound={}&icon={}&url={}",
            self.base_url,
            encode_component(&alert.title),
            encode_component(&alert.body),
            PUSH_GROUP,
            PUSH_LEVEL,
            PUSH_SOUND,
            PUSH_ICON,
            encode_component(&alert.callback_url),
        )
    }
}

#[async_trait]
impl PushGateway for BarkGateway {
    async fn push(&self, alert: &PushAlert) -> Result<(), PushError> {
        let response = self.client.get(self.push_url(alert)).send().await?;
        if !response.status().is_success() {
            return Err(PushError::Status(response.status()));
        }
        tracing::info!("Push delivered: {}", alert.title);
        Ok(())
    }
}

/// 未配置 Bark 时使用，只把通知内容写进日志
pub struct LogGateway;

#[async_trait]
impl PushGateway for LogGateway {
    async fn push(&self, alert: &PushAlert) -> Result<(), PushError> {
        tracing::info!(
            "Mock Push: {} (confirm at {})",
            alert.body,
            alert.callback_url
        );
        Ok(())
    }
}

/// 在后台任务中推送，调用方不等待结果
pub fn dispatch(gateway: Arc<dyn PushGateway>, alert: PushAlert) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = gateway.push(&alert).await {
            tracing::error!("Bark push failed: {}", e);
        }
    })
}
