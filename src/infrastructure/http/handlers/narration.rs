//! Narration Handlers - 控制面命令与状态查询

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{
    BeginNarrationCommand, GetNarrationStatusQuery, NarrationStatusView, PauseCommand,
    ResumeCommand,
};
use crate::infrastructure::http::dto::{
    ApiResponse, NarrationProgressResponse, NarrationStartedResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Begin
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BeginRequest {
    pub listener_id: String,
    pub source_title: String,
    pub text: String,
}

pub async fn begin_narration(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BeginRequest>,
) -> Result<Json<ApiResponse<NarrationStartedResponse>>, ApiError> {
    let cmd = BeginNarrationCommand {
        listener_id: req.listener_id,
        source_title: req.source_title,
        text: req.text,
    };

    let result = state.begin_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(NarrationStartedResponse {
        listener_id: result.listener_id,
        source_title: result.source_title,
        total_units: result.total_units,
        summary: result.summary,
    })))
}

// ============================================================================
// Pause
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PauseRequest {
    pub listener_id: String,
}

pub async fn pause_narration(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PauseRequest>,
) -> Result<Json<ApiResponse<NarrationProgressResponse>>, ApiError> {
    let cmd = PauseCommand {
        listener_id: req.listener_id,
    };

    let result = state.pause_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(NarrationProgressResponse {
        listener_id: result.listener_id,
        source_title: result.source_title,
        cursor: result.cursor,
        total_units: result.total_units,
        summary: result.summary,
    })))
}

// ============================================================================
// Resume
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub listener_id: String,
}

pub async fn resume_narration(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResumeRequest>,
) -> Result<Json<ApiResponse<NarrationProgressResponse>>, ApiError> {
    let cmd = ResumeCommand {
        listener_id: req.listener_id,
    };

    let result = state.resume_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(NarrationProgressResponse {
        listener_id: result.listener_id,
        source_title: result.source_title,
        cursor: result.cursor,
        total_units: result.total_units,
        summary: result.summary,
    })))
}

// ============================================================================
// Status
// ============================================================================

pub async fn narration_status(
    State(state): State<Arc<AppState>>,
    Path(listener_id): Path<String>,
) -> Result<Json<ApiResponse<NarrationStatusView>>, ApiError> {
    let query = GetNarrationStatusQuery { listener_id };
    let view = state.status_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(view)))
}
