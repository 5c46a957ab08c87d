//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 播放驱动配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 传输配置
    #[serde(default)]
    pub transport: TransportConfig,

    /// 网页抓取配置
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTS 引擎选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsEngineKind {
    /// 外部 HTTP 合成服务
    Http,
    /// 本地 piper 子进程
    Piper,
    /// 测试用固定音频
    Fake,
}

impl Default for TtsEngineKind {
    fn default() -> Self {
        Self::Http
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 引擎种类
    #[serde(default)]
    pub engine: TtsEngineKind,

    /// TTS 服务基础 URL（engine = http）
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// piper 可执行文件路径（engine = piper）
    #[serde(default = "default_piper_binary")]
    pub piper_binary: PathBuf,

    /// piper 语音模型路径（engine = piper）
    #[serde(default = "default_piper_model")]
    pub piper_model: PathBuf,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_piper_binary() -> PathBuf {
    PathBuf::from("piper")
}

fn default_piper_model() -> PathBuf {
    PathBuf::from("models/en_US-lessac-medium.onnx")
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            engine: TtsEngineKind::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            piper_binary: default_piper_binary(),
            piper_model: default_piper_model(),
        }
    }
}

/// 播放驱动配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 连续合成失败多少次后中止会话
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
}

fn default_max_consecutive_failures() -> u32 {
    3
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: default_max_consecutive_failures(),
        }
    }
}

/// 传输配置
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// 无法确定片段时长时的回退播放时长（毫秒）
    #[serde(default = "default_fallback_clip_ms")]
    pub fallback_clip_ms: u64,
}

fn default_fallback_clip_ms() -> u64 {
    3000
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            fallback_clip_ms: default_fallback_clip_ms(),
        }
    }
}

/// 网页抓取配置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_scraper_timeout")]
    pub timeout_secs: u64,
}

fn default_scraper_timeout() -> u64 {
    30
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_scraper_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 进度数据库路径
    #[serde(default = "default_progress_path")]
    pub progress_path: String,
}

fn default_progress_path() -> String {
    "data/progress.sled".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            progress_path: default_progress_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.tts.url, "http://localhost:8000");
        assert_eq!(config.tts.engine, TtsEngineKind::Http);
        assert_eq!(config.playback.max_consecutive_failures, 3);
        assert_eq!(config.storage.progress_path, "data/progress.sled");
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5070");
    }
}
