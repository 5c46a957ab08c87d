//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping                          GET   存活检查
//! - /api/narration/begin              POST  朗读一段文本
//! - /api/narration/read               POST  朗读上传的文档（multipart）
//! - /api/narration/scrape             POST  朗读抓取的网页
//! - /api/narration/pause              POST  暂停并写检查点
//! - /api/narration/resume             POST  从检查点恢复
//! - /api/narration/status/{listener}  GET   查询活动会话
//! - /ws/events/{listener}             WS    监听者事件流

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events/:listener_id", get(handlers::websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/narration", narration_routes())
}

/// Narration 路由
fn narration_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/begin", post(handlers::begin_narration))
        .route("/read", post(handlers::read_document))
        .route("/scrape", post(handlers::scrape_page))
        .route("/pause", post(handlers::pause_narration))
        .route("/resume", post(handlers::resume_narration))
        .route("/status/:listener_id", get(handlers::narration_status))
}
