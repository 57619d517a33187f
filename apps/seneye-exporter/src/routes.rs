//! 路由定义
//!
//! - 健康检查：/health（每个监听器都有）
//! - LDE 推送：POST <lde path>
//! - 指标抓取：GET <metrics path>

use super::AppState;
use super::handlers::*;
use super::middleware::request_context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub fn create_lde_router(path: &str) -> Router<AppState> {
    Router::new().route(path, post(receive_push))
}

pub fn create_metrics_router(path: &str) -> Router<AppState> {
    Router::new().route(path, get(get_metrics))
}

/// 挂载健康检查、状态与公共中间件。
pub fn finish(router: Router<AppState>, state: AppState) -> Router {
    router
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http())
}
