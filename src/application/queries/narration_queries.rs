//! Narration Queries - 查询定义

use serde::Serialize;

/// 查询监听者的朗读状态
#[derive(Debug, Clone)]
pub struct GetNarrationStatusQuery {
    pub listener_id: String,
}

/// 朗读状态视图
#[derive(Debug, Clone, Serialize)]
pub struct NarrationStatusView {
    pub listener_id: String,
    /// 是否有活动会话
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_units: Option<usize>,
}
