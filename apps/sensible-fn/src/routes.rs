//! 路由定义
//!
//! - 健康检查：/health
//! - 推送入口：/、/pubsub/push
//! - 计数器：/metrics

use super::AppState;
use super::handlers::*;
use super::health;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建函数宿主路由
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", post(receive_push))
        .route("/pubsub/push", post(receive_push))
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
}
