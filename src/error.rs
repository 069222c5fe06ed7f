use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// 存储层错误，读取时降级为"不存在"，写入时向上传递
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("存储文件读写失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("存储数据格式错误: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Redis 操作失败: {0}")]
    Redis(#[from] redis::RedisError),
}

/// 推送网关错误，只记录日志，不影响请求结果
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("推送请求失败: {0}")]
    Request(#[from] reqwest::Error),
    #[error("推送网关返回状态码 {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(ErrorResponse {
            success: false,
            error,
        });

        (status, body).into_response()
    }
}
