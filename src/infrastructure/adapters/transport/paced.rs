//! Paced Transport - 按音频实际时长节拍播放的传输实现
//!
//! 把"一个句子的播放"实现为等待该片段的真实时长，等待期间可被
//! 断开打断。每个监听者一个 CancellationToken，disconnect 触发取消，
//! 正在 play 中挂起的等待立即以 Disconnected 返回。
//!
//! 时长来源优先级：引擎报告的 duration_ms > WAV 头探测 > 配置回退值。

use async_trait::async_trait;
use dashmap::DashMap;
use std::io::Cursor;
use std::time::Duration;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioClip, PlayOutcome, TransportError, TransportPort};

/// Paced Transport 配置
#[derive(Debug, Clone)]
pub struct PacedTransportConfig {
    /// 无法确定片段时长时的回退播放时长（毫秒）
    pub fallback_clip_ms: u64,
}

impl Default for PacedTransportConfig {
    fn default() -> Self {
        Self {
            fallback_clip_ms: 3000,
        }
    }
}

/// Paced Transport
pub struct PacedTransport {
    config: PacedTransportConfig,
    /// listener_id -> 断开令牌
    channels: DashMap<String, CancellationToken>,
}

impl PacedTransport {
    pub fn new(config: PacedTransportConfig) -> Self {
        Self {
            config,
            channels: DashMap::new(),
        }
    }

    /// 用 symphonia 探测 WAV 头里的帧数和采样率推算时长
    fn probe_duration_ms(data: &[u8]) -> Option<u64> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("wav");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .ok()?;

        let track = probed.format.default_track()?;
        let n_frames = track.codec_params.n_frames?;
        let sample_rate = track.codec_params.sample_rate?;
        if sample_rate == 0 {
            return None;
        }
        Some(n_frames * 1000 / sample_rate as u64)
    }

    fn clip_duration(&self, clip: &AudioClip) -> Duration {
        let ms = clip
            .duration_ms
            .or_else(|| Self::probe_duration_ms(&clip.data))
            .unwrap_or(self.config.fallback_clip_ms);
        Duration::from_millis(ms)
    }
}

#[async_trait]
impl TransportPort for PacedTransport {
    async fn connect(&self, listener_id: &str) -> Result<(), TransportError> {
        // 重复 connect 先换新令牌，旧的挂起等待全部结束
        if let Some((_, old)) = self.channels.remove(listener_id) {
            old.cancel();
        }
        self.channels
            .insert(listener_id.to_string(), CancellationToken::new());
        tracing::debug!(listener_id = %listener_id, "Transport channel connected");
        Ok(())
    }

    async fn play(
        &self,
        listener_id: &str,
        clip: AudioClip,
    ) -> Result<PlayOutcome, TransportError> {
        let token = self
            .channels
            .get(listener_id)
            .map(|t| t.clone())
            .ok_or_else(|| TransportError::NotConnected(listener_id.to_string()))?;

        if token.is_cancelled() {
            return Ok(PlayOutcome::Disconnected);
        }

        let duration = self.clip_duration(&clip);
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(PlayOutcome::Completed),
            _ = token.cancelled() => Ok(PlayOutcome::Disconnected),
        }
    }

    async fn disconnect(&self, listener_id: &str) {
        if let Some((_, token)) = self.channels.remove(listener_id) {
            token.cancel();
            tracing::debug!(listener_id = %listener_id, "Transport channel disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(duration_ms: Option<u64>) -> AudioClip {
        AudioClip {
            data: vec![0u8; 16],
            duration_ms,
            sample_rate: Some(22050),
        }
    }

    /// 44 字节头 + 指定帧数静音的最小 WAV
    fn wav_bytes(sample_rate: u32, n_frames: u32) -> Vec<u8> {
        let data_size = n_frames * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_size).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_size.to_le_bytes());
        wav.extend(std::iter::repeat(0u8).take(data_size as usize));
        wav
    }

    #[tokio::test]
    async fn test_play_without_connect_is_not_connected() {
        let transport = PacedTransport::new(PacedTransportConfig::default());
        let err = transport.play("l1", clip(Some(1))).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected(_)));
    }

    #[tokio::test]
    async fn test_play_completes_after_clip_duration() {
        let transport = PacedTransport::new(PacedTransportConfig::default());
        transport.connect("l1").await.unwrap();

        let outcome = transport.play("l1", clip(Some(10))).await.unwrap();
        assert_eq!(outcome, PlayOutcome::Completed);
    }

    #[tokio::test]
    async fn test_disconnect_interrupts_play() {
        let transport = std::sync::Arc::new(PacedTransport::new(PacedTransportConfig::default()));
        transport.connect("l1").await.unwrap();

        let play = {
            let transport = transport.clone();
            tokio::spawn(async move { transport.play("l1", clip(Some(60_000))).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        transport.disconnect("l1").await;

        let outcome = play.await.unwrap().unwrap();
        assert_eq!(outcome, PlayOutcome::Disconnected);
    }

    #[tokio::test]
    async fn test_play_after_disconnect_is_not_connected() {
        let transport = PacedTransport::new(PacedTransportConfig::default());
        transport.connect("l1").await.unwrap();
        // disconnect 摘除通道，之后 play 视为未连接
        transport.disconnect("l1").await;

        let err = transport.play("l1", clip(Some(1))).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected(_)));
    }

    #[test]
    fn test_probe_duration_from_wav_header() {
        let wav = wav_bytes(22050, 22050); // 正好 1 秒
        let ms = PacedTransport::probe_duration_ms(&wav).unwrap();
        assert_eq!(ms, 1000);
    }

    #[test]
    fn test_probe_garbage_returns_none() {
        assert!(PacedTransport::probe_duration_ms(b"not audio").is_none());
    }

    #[tokio::test]
    async fn test_unknown_duration_falls_back_to_config() {
        let transport = PacedTransport::new(PacedTransportConfig { fallback_clip_ms: 5 });
        transport.connect("l1").await.unwrap();

        let start = std::time::Instant::now();
        let outcome = transport.play("l1", clip(None)).await.unwrap();
        assert_eq!(outcome, PlayOutcome::Completed);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
