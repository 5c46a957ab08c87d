//! Data Transfer Objects

use serde::Serialize;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    #[allow(dead_code)]
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Narration DTOs
// ============================================================================

/// begin/read/scrape 的响应
#[derive(Debug, Serialize)]
pub struct NarrationStartedResponse {
    pub listener_id: String,
    pub source_title: String,
    pub total_units: usize,
    pub summary: String,
}

/// pause/resume 的响应
#[derive(Debug, Serialize)]
pub struct NarrationProgressResponse {
    pub listener_id: String,
    pub source_title: String,
    pub cursor: usize,
    pub total_units: usize,
    pub summary: String,
}
