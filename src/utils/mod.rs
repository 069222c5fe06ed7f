use axum::http::{HeaderMap, header};

pub mod geo;

pub use geo::{MapUrls, generate_map_urls, out_of_china, wgs84_to_gcj02};

/// 根据请求头还原站点地址，用于拼接车主确认页的回调链接。
/// 部署在反向代理之后时优先使用 X-Forwarded-Proto / X-Forwarded-Host。
pub fn request_origin(headers: &HeaderMap) -> String {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let protocol = header_value("x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    let host = header_value("x-forwarded-host")
        .or_else(|| header_value(header::HOST.as_str()))
        .unwrap_or_else(|| "localhost".to_string());

    format!("{}://{}", protocol, host)
}

/// 当前 Unix 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
