//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 始终返回固定的音频数据，不实际调用合成服务

use async_trait::async_trait;

use crate::application::ports::{AudioClip, SynthesisError, TtsEnginePort};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 模拟的合成延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            duration_ms: 200,
            sample_rate: 22050,
            latency_ms: 20,
        }
    }
}

/// Fake TTS Client
///
/// 用于测试和本地开发，返回内容无关的固定音频
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    audio_data: Vec<u8>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        Self {
            config,
            audio_data: vec![0u8; 64],
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, unit: &str) -> Result<AudioClip, SynthesisError> {
        tracing::debug!(
            text_len = unit.len(),
            "FakeTtsClient: returning fixed audio"
        );

        // 模拟合成延迟
        tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;

        Ok(AudioClip {
            data: self.audio_data.clone(),
            duration_ms: Some(self.config.duration_ms),
            sample_rate: Some(self.config.sample_rate),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
