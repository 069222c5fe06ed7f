use serde::{Deserialize, Serialize};

use crate::common::Coordinate;
use crate::utils::{MapUrls, generate_map_urls};

/// 位置记录，同时携带转换后的地图链接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub lat: f64,
    pub lng: f64,
    #[serde(flatten)]
    pub urls: MapUrls,
    /// 车主确认时间（毫秒），只有车主的记录才有
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl LocationRecord {
    pub fn requester(coord: Coordinate) -> Self {
        Self {
            lat: coord.lat,
            lng: coord.lng,
            urls: generate_map_urls(coord.lat, coord.lng),
            timestamp: None,
        }
    }

    pub fn owner(coord: Coordinate, timestamp: i64) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Self::requester(coord)
        }
    }
}

/// 通知状态，键不存在时按 waiting 处理
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyStatus {
    #[default]
    Waiting,
    Confirmed,
}

impl NotifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyStatus::Waiting => "waiting",
            NotifyStatus::Confirmed => "confirmed",
        }
    }

    /// 无法识别的值按 waiting 处理
    pub fn from_stored(value: &str) -> Self {
        match value {
            "confirmed" => NotifyStatus::Confirmed,
            _ => NotifyStatus::Waiting,
        }
    }
}
