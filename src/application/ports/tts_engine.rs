//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层。
//! 每个句子只尝试合成一次，重试策略不属于核心。

use async_trait::async_trait;
use thiserror::Error;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Process error: {0}")]
    ProcessError(String),
}

/// 一个句子合成出的音频片段
///
/// 驱动器不解析音频内容，原样交给传输层。
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// 原始音频数据（WAV/PCM）
    pub data: Vec<u8>,
    /// 音频时长（毫秒），引擎未知时为 None
    pub duration_ms: Option<u64>,
    /// 采样率
    pub sample_rate: Option<u32>,
}

/// TTS Engine Port
///
/// 外部语音合成服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成一个句子的音频（单次尝试）
    async fn synthesize(&self, unit: &str) -> Result<AudioClip, SynthesisError>;

    /// 检查合成服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
