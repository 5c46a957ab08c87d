//! Lector - 朗读会话服务
//!
//! 把文档和网页切分成句子，逐句合成语音播进监听者的语音通道，
//! 暂停时把进度落盘，之后可从断点恢复。
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - NarrationSession: 朗读会话聚合（句子序列、游标、播放标志）
//! - Segmenter: 句子切分
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, Transport, ProgressStore, TextSource, Registry）
//! - Commands: CQRS 命令处理器（begin/read/scrape/pause/resume）
//! - Queries: CQRS 查询处理器（status）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: 会话注册表内存实现
//! - Worker: PlaybackDriver 逐句播放任务
//! - Persistence: Sled 进度存储
//! - Adapters: TTS 客户端、文档抽取、网页抓取、传输
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
