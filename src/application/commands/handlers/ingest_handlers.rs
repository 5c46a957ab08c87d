//! Ingest Command Handlers - 文档上传 / 网页抓取入口
//!
//! 抽取失败发生在会话创建之前，直接上报，不产生任何状态变化。

use std::sync::Arc;

use crate::application::commands::handlers::narration_handlers::BeginNarrationHandler;
use crate::application::commands::narration_commands::{
    BeginNarrationCommand, BeginNarrationResponse, ReadDocumentCommand, ScrapePageCommand,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{DocumentExtractorPort, WebScraperPort};

/// Read Handler - 朗读上传的文档
pub struct ReadDocumentHandler {
    extractor: Arc<dyn DocumentExtractorPort>,
    begin: BeginNarrationHandler,
}

impl ReadDocumentHandler {
    pub fn new(
        extractor: Arc<dyn DocumentExtractorPort>,
        begin: BeginNarrationHandler,
    ) -> Self {
        Self { extractor, begin }
    }

    pub async fn handle(
        &self,
        cmd: ReadDocumentCommand,
    ) -> Result<BeginNarrationResponse, ApplicationError> {
        let extracted = self.extractor.extract(&cmd.filename, &cmd.data)?;

        tracing::info!(
            listener_id = %cmd.listener_id,
            filename = %cmd.filename,
            title = %extracted.title,
            text_len = extracted.text.len(),
            "Document extracted"
        );

        self.begin
            .handle(BeginNarrationCommand {
                listener_id: cmd.listener_id,
                source_title: extracted.title,
                text: extracted.text,
            })
            .await
    }
}

/// Scrape Handler - 朗读抓取的网页
pub struct ScrapePageHandler {
    scraper: Arc<dyn WebScraperPort>,
    begin: BeginNarrationHandler,
}

impl ScrapePageHandler {
    pub fn new(scraper: Arc<dyn WebScraperPort>, begin: BeginNarrationHandler) -> Self {
        Self { scraper, begin }
    }

    pub async fn handle(
        &self,
        cmd: ScrapePageCommand,
    ) -> Result<BeginNarrationResponse, ApplicationError> {
        let extracted = self.scraper.scrape(&cmd.url).await?;

        tracing::info!(
            listener_id = %cmd.listener_id,
            url = %cmd.url,
            title = %extracted.title,
            text_len = extracted.text.len(),
            "Page scraped"
        );

        self.begin
            .handle(BeginNarrationCommand {
                listener_id: cmd.listener_id,
                source_title: extracted.title,
                text: extracted.text,
            })
            .await
    }
}
