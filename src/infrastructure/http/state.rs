//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    BeginNarrationHandler, PauseHandler, ReadDocumentHandler, ResumeHandler, ScrapePageHandler,
    // Query handlers
    GetNarrationStatusHandler,
    // Ports
    DocumentExtractorPort, NarrationRegistryPort, TtsEnginePort, WebScraperPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub registry: Arc<dyn NarrationRegistryPort>,
    pub tts_engine: Arc<dyn TtsEnginePort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub begin_handler: BeginNarrationHandler,
    pub read_document_handler: ReadDocumentHandler,
    pub scrape_page_handler: ScrapePageHandler,
    pub pause_handler: PauseHandler,
    pub resume_handler: ResumeHandler,

    // ========== Query Handlers ==========
    pub status_handler: GetNarrationStatusHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        registry: Arc<dyn NarrationRegistryPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        extractor: Arc<dyn DocumentExtractorPort>,
        scraper: Arc<dyn WebScraperPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            registry: registry.clone(),
            tts_engine,
            event_publisher,

            begin_handler: BeginNarrationHandler::new(registry.clone()),
            read_document_handler: ReadDocumentHandler::new(
                extractor,
                BeginNarrationHandler::new(registry.clone()),
            ),
            scrape_page_handler: ScrapePageHandler::new(
                scraper,
                BeginNarrationHandler::new(registry.clone()),
            ),
            pause_handler: PauseHandler::new(registry.clone()),
            resume_handler: ResumeHandler::new(registry.clone()),

            status_handler: GetNarrationStatusHandler::new(registry),
        }
    }
}
