use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, error::AppError, utils::request_origin};

use super::model::{NotifyRequest, OwnerConfirmRequest, StatusResponse, SuccessResponse};

// 不要求 Content-Type，空请求体按 `{}` 处理
#[axum::debug_handler]
pub async fn notify(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        NotifyRequest::default()
    } else {
        serde_json::from_slice::<NotifyRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("请求体不是合法的 JSON: {}", e)))?
    };

    let origin = request_origin(&headers);
    state.coordinator.submit_notify(req, &origin).await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[axum::debug_handler]
pub async fn get_location(State(state): State<AppState>) -> Response {
    match state.coordinator.get_requester_location().await {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "No location" }))).into_response(),
    }
}

// 车主确认永远返回成功，请求体无法解析时按空请求处理
#[axum::debug_handler]
pub async fn owner_confirm(State(state): State<AppState>, body: Bytes) -> Json<SuccessResponse> {
    let req = if body.is_empty() {
        OwnerConfirmRequest::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            tracing::warn!("Malformed owner-confirm body, confirming without location: {}", e);
            OwnerConfirmRequest::default()
        })
    };

    state.coordinator.confirm_by_owner(req).await;
    Json(SuccessResponse { success: true })
}

#[axum::debug_handler]
pub async fn check_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.coordinator.check_status().await)
}
