//! Progress Store Port - 阅读进度持久化
//!
//! 每个监听者一条记录，save 整条覆盖写入（无部分更新、无版本历史）。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::NarrationSession;

/// 进度存储错误
#[derive(Debug, Error)]
pub enum ProgressStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 保存的阅读进度快照
///
/// 字段布局固定为 {source_title, units, cursor}；units 原样整序列保存，
/// 恢复时不重新切分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    pub source_title: String,
    pub units: Vec<String>,
    pub cursor: usize,
}

impl SavedProgress {
    /// 给会话拍快照
    pub fn snapshot(session: &NarrationSession) -> Self {
        Self {
            source_title: session.source_title().to_string(),
            units: session.units().to_vec(),
            cursor: session.cursor(),
        }
    }
}

/// Progress Store Port
///
/// 监听者 -> 进度记录 的持久化键值存储
#[async_trait]
pub trait ProgressStorePort: Send + Sync {
    /// 写入监听者的进度（整条覆盖，原子生效）
    async fn save(&self, listener_id: &str, progress: &SavedProgress)
        -> Result<(), ProgressStoreError>;

    /// 读取监听者的进度；不存在时返回 None
    async fn load(&self, listener_id: &str)
        -> Result<Option<SavedProgress>, ProgressStoreError>;
}
