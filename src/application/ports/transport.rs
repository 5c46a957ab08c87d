//! Transport Port - 语音通道传输抽象
//!
//! 定义音频送往监听者语音会话的抽象接口。
//! `play` 把每个句子的播放收敛成一个"完成或断开"的单一可等待信号，
//! 驱动器的顺序不变量由此机械保证，不依赖回调纪律。

use async_trait::async_trait;
use thiserror::Error;

use super::tts_engine::AudioClip;

/// 传输错误
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Not connected for listener: {0}")]
    NotConnected(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// 单个句子播放的结果信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// 播放正常结束
    Completed,
    /// 传输在播放中断开（监听者离开语音会话等）
    Disconnected,
}

/// Transport Port
///
/// 监听者语音会话的抽象接口；音频对传输层之上完全不透明
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// 接入监听者的语音通道
    async fn connect(&self, listener_id: &str) -> Result<(), TransportError>;

    /// 提交一个音频片段播放，等待播放完成或断开信号
    async fn play(&self, listener_id: &str, clip: AudioClip)
        -> Result<PlayOutcome, TransportError>;

    /// 释放监听者的语音通道（幂等）
    async fn disconnect(&self, listener_id: &str);
}
