//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{ExtractionError, FetchError, RegistryError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource} not found for listener: {listener_id}")]
    NotFound {
        resource: &'static str,
        listener_id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 该监听者没有活动朗读
    #[error("No active narration for listener: {0}")]
    NotActive(String),

    /// 该监听者已有活动朗读
    #[error("Narration already active for listener: {0}")]
    AlreadyActive(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RegistryError> for ApplicationError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotActive(id) => Self::NotActive(id),
            RegistryError::NotFound(id) => Self::NotFound {
                resource: "Saved progress",
                listener_id: id,
            },
            RegistryError::AlreadyActive(id) => Self::AlreadyActive(id),
            RegistryError::Store(e) => Self::StorageError(e.to_string()),
            RegistryError::Transport(e) => Self::ExternalServiceError(e.to_string()),
        }
    }
}

impl From<ExtractionError> for ApplicationError {
    fn from(err: ExtractionError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<FetchError> for ApplicationError {
    fn from(err: FetchError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}
