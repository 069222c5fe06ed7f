use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware::log_errors, routes};

// 接口路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/notify", post(routes::notify::notify))
        .route("/api/get-location", get(routes::notify::get_location))
        .route("/api/owner-confirm", post(routes::notify::owner_confirm))
        .route("/api/check-status", get(routes::notify::check_status))
}

// 页面路由
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::pages::index))
        .route(
            routes::notify::OWNER_CONFIRM_PATH,
            get(routes::pages::owner_confirm_page),
        )
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .merge(page_routes())
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
