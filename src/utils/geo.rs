//! WGS-84 到 GCJ-02（国测局坐标）的转换，以及地图跳转链接生成。
//!
//! 浏览器定位得到的是 WGS-84 坐标，高德等国内地图使用 GCJ-02，
//! 直接使用原始坐标会偏移数百米。

use std::f64::consts::PI;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::common::Coordinate;

/// 克拉索夫斯基椭球长半轴
const SEMI_MAJOR_AXIS: f64 = 6378245.0;
/// 偏心率平方
const ECCENTRICITY_SQ: f64 = 0.00669342162296594323;

/// 地图标注名称
const PLACE_LABEL: &str = "位置";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapUrls {
    pub amap_url: String,
    pub apple_url: String,
}

/// 粗略的中国范围矩形，范围外不做偏移
pub fn out_of_china(lat: f64, lng: f64) -> bool {
    lng < 72.004 || lng > 137.8347 || lat < 0.8293 || lat > 55.8271
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret =
        -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

pub fn wgs84_to_gcj02(lat: f64, lng: f64) -> Coordinate {
    if out_of_china(lat, lng) {
        return Coordinate::new(lat, lng);
    }

    let mut d_lat = transform_lat(lng - 105.0, lat - 35.0);
    let mut d_lng = transform_lng(lng - 105.0, lat - 35.0);

    let rad_lat = lat / 180.0 * PI;
    let mut magic = rad_lat.sin();
    magic = 1.0 - ECCENTRICITY_SQ * magic * magic;
    let sqrt_magic = magic.sqrt();

    d_lat = (d_lat * 180.0)
        / ((SEMI_MAJOR_AXIS * (1.0 - ECCENTRICITY_SQ)) / (magic * sqrt_magic) * PI);
    d_lng = (d_lng * 180.0) / (SEMI_MAJOR_AXIS / sqrt_magic * rad_lat.cos() * PI);

    Coordinate::new(lat + d_lat, lng + d_lng)
}

/// 先转换坐标，再生成高德和 Apple 地图链接
pub fn generate_map_urls(lat: f64, lng: f64) -> MapUrls {
    let gcj = wgs84_to_gcj02(lat, lng);
    let label = utf8_percent_encode(PLACE_LABEL, NON_ALPHANUMERIC);

    MapUrls {
        amap_url: format!(
            "https://uri.amap.com/marker?position={},{}&name={}",
            gcj.lng, gcj.lat, label
        ),
        apple_url: format!(
            "https://maps.apple.com/?ll={},{}&q={}",
            gcj.lat, gcj.lng, label
        ),
    }
}
