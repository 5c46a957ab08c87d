//! Session Registry Port - 会话注册表抽象
//!
//! 进程级 监听者 -> 活动朗读会话 的映射。每个监听者同时最多一个活动会话；
//! start 对同一监听者是破坏性的：先把旧会话按 stop 的语义打检查点再替换。

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::progress_store::{ProgressStoreError, SavedProgress};
use super::transport::TransportError;
use crate::domain::NarrationSession;

/// 注册表错误
#[derive(Debug, Error)]
pub enum RegistryError {
    /// stop：该监听者没有活动会话
    #[error("No active narration for listener: {0}")]
    NotActive(String),

    /// resume：该监听者没有保存的进度
    #[error("No saved progress for listener: {0}")]
    NotFound(String),

    /// resume：该监听者已有活动会话（需要先 stop）
    #[error("Narration already active for listener: {0}")]
    AlreadyActive(String),

    #[error("Progress store error: {0}")]
    Store(#[from] ProgressStoreError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// 活动会话的对外视图
#[derive(Debug, Clone, Serialize)]
pub struct SessionHandle {
    pub listener_id: String,
    pub source_title: String,
    pub cursor: usize,
    pub total_units: usize,
    pub playing: bool,
}

impl SessionHandle {
    pub fn of(session: &NarrationSession) -> Self {
        Self {
            listener_id: session.listener_id().to_string(),
            source_title: session.source_title().to_string(),
            cursor: session.cursor(),
            total_units: session.total_units(),
            playing: session.is_playing(),
        }
    }
}

/// Narration Registry Port
///
/// start/stop/resume 对同一监听者互斥串行执行
#[async_trait]
pub trait NarrationRegistryPort: Send + Sync {
    /// 开始一次新的朗读
    ///
    /// 同一监听者已有会话时：先取消其驱动任务，未完成则按 stop 语义
    /// 写检查点并释放传输，再安装新会话。
    async fn start(
        &self,
        listener_id: &str,
        source_title: &str,
        units: Vec<String>,
    ) -> Result<SessionHandle, RegistryError>;

    /// 暂停并落盘：快照写入进度存储，释放传输，摘除注册表项
    async fn stop(&self, listener_id: &str) -> Result<SavedProgress, RegistryError>;

    /// 从保存的进度恢复朗读
    async fn resume(&self, listener_id: &str) -> Result<SessionHandle, RegistryError>;

    /// 查询活动会话（无则 None）
    fn status(&self, listener_id: &str) -> Option<SessionHandle>;

    /// 该监听者是否有活动会话
    fn is_active(&self, listener_id: &str) -> bool;
}
