//! 应用层
//!
//! - ports: 出站端口（TTS、传输、进度存储、文本来源、会话注册表）
//! - commands: 控制面命令与处理器
//! - queries: 状态查询
//! - error: 统一应用错误

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

pub use commands::{
    BeginNarrationCommand, BeginNarrationHandler, BeginNarrationResponse, PauseCommand,
    PauseHandler, PauseResponse, ReadDocumentCommand, ReadDocumentHandler, ResumeCommand,
    ResumeHandler, ResumeResponse, ScrapePageCommand, ScrapePageHandler,
};
pub use error::ApplicationError;
pub use ports::{
    AudioClip, DocumentExtractorPort, ExtractedText, ExtractionError, FetchError,
    NarrationRegistryPort, PlayOutcome, ProgressStoreError, ProgressStorePort, RegistryError,
    SavedProgress, SessionHandle, SynthesisError, TransportError, TransportPort, TtsEnginePort,
    WebScraperPort,
};
pub use queries::{GetNarrationStatusHandler, GetNarrationStatusQuery, NarrationStatusView};
