//! Piper TTS Client - 本地 Piper 进程合成
//!
//! 每个句子起一个 piper 子进程：文本写 stdin，WAV 落到临时文件，
//! 读回后立即删除。

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uuid::Uuid;

use crate::application::ports::{AudioClip, SynthesisError, TtsEnginePort};

/// Piper TTS 客户端配置
#[derive(Debug, Clone)]
pub struct PiperTtsClientConfig {
    /// piper 可执行文件路径
    pub binary: PathBuf,
    /// 语音模型路径（.onnx）
    pub model: PathBuf,
    /// 临时 WAV 文件目录
    pub work_dir: PathBuf,
}

impl Default for PiperTtsClientConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("piper"),
            model: PathBuf::from("models/en_US-lessac-medium.onnx"),
            work_dir: std::env::temp_dir(),
        }
    }
}

/// Piper TTS 客户端
pub struct PiperTtsClient {
    config: PiperTtsClientConfig,
}

impl PiperTtsClient {
    pub fn new(config: PiperTtsClientConfig) -> Self {
        tracing::info!(
            binary = %config.binary.display(),
            model = %config.model.display(),
            "PiperTtsClient initialized"
        );
        Self { config }
    }

    fn output_path(&self) -> PathBuf {
        self.config
            .work_dir
            .join(format!("piper-{}.wav", Uuid::new_v4()))
    }
}

#[async_trait]
impl TtsEnginePort for PiperTtsClient {
    async fn synthesize(&self, unit: &str) -> Result<AudioClip, SynthesisError> {
        let output_path = self.output_path();

        let mut child = Command::new(&self.config.binary)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--output_file")
            .arg(&output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SynthesisError::ProcessError(format!("Failed to spawn piper: {}", e))
            })?;

        // 句子写入 stdin 后关闭，piper 读到 EOF 才开始合成
        {
            let mut stdin = child.stdin.take().ok_or_else(|| {
                SynthesisError::ProcessError("Failed to open piper stdin".to_string())
            })?;
            stdin
                .write_all(unit.as_bytes())
                .await
                .map_err(|e| SynthesisError::ProcessError(e.to_string()))?;
            stdin
                .shutdown()
                .await
                .map_err(|e| SynthesisError::ProcessError(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SynthesisError::ProcessError(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(SynthesisError::ProcessError(format!(
                "piper exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let data = tokio::fs::read(&output_path).await.map_err(|e| {
            SynthesisError::ProcessError(format!("Failed to read piper output: {}", e))
        })?;
        let _ = tokio::fs::remove_file(&output_path).await;

        if data.is_empty() {
            return Err(SynthesisError::InvalidResponse(
                "piper produced empty audio".to_string(),
            ));
        }

        tracing::debug!(
            text_len = unit.len(),
            audio_size = data.len(),
            "Piper synthesis completed"
        );

        // 时长由传输层从 WAV 头探测
        Ok(AudioClip {
            data,
            duration_ms: None,
            sample_rate: None,
        })
    }

    async fn health_check(&self) -> bool {
        Command::new(&self.config.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
