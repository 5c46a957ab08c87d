//! Ingest Handlers - 文档上传与网页抓取

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{ReadDocumentCommand, ScrapePageCommand};
use crate::infrastructure::http::dto::{ApiResponse, NarrationStartedResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Read Document (multipart)
// ============================================================================

/// multipart 字段：
/// - listener_id: 文本
/// - file: 文档（文件名决定格式）
pub async fn read_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<NarrationStartedResponse>>, ApiError> {
    let mut listener_id: Option<String> = None;
    let mut filename: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart data: {}", e)))?
    {
        match field.name() {
            Some("listener_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid listener_id: {}", e)))?;
                listener_id = Some(value);
            }
            Some("file") => {
                filename = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                data = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let listener_id =
        listener_id.ok_or_else(|| ApiError::BadRequest("Missing field: listener_id".to_string()))?;
    let filename =
        filename.ok_or_else(|| ApiError::BadRequest("Missing file name in upload".to_string()))?;
    let data = data.ok_or_else(|| ApiError::BadRequest("Missing field: file".to_string()))?;

    let cmd = ReadDocumentCommand {
        listener_id,
        filename,
        data,
    };

    let result = state.read_document_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(NarrationStartedResponse {
        listener_id: result.listener_id,
        source_title: result.source_title,
        total_units: result.total_units,
        summary: result.summary,
    })))
}

// ============================================================================
// Scrape Page
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub listener_id: String,
    pub url: String,
}

pub async fn scrape_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScrapeRequest>,
) -> Result<Json<ApiResponse<NarrationStartedResponse>>, ApiError> {
    let cmd = ScrapePageCommand {
        listener_id: req.listener_id,
        url: req.url,
    };

    let result = state.scrape_page_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(NarrationStartedResponse {
        listener_id: result.listener_id,
        source_title: result.source_title,
        total_units: result.total_units,
        summary: result.summary,
    })))
}
