//! Ping Handler - 存活检查

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub pong: bool,
    pub tts_healthy: bool,
}

pub async fn ping(State(state): State<Arc<AppState>>) -> Json<ApiResponse<PingResponse>> {
    let tts_healthy = state.tts_engine.health_check().await;
    Json(ApiResponse::success(PingResponse {
        pong: true,
        tts_healthy,
    }))
}
