//! Text Source Ports - 文本来源抽象
//!
//! 文档抽取与网页抓取两个入站数据源。任一失败都发生在会话创建之前，
//! 核心把失败当作"没有产生任何句子"直接上报。

use async_trait::async_trait;
use thiserror::Error;

/// 文档抽取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Document contains no text: {0}")]
    Empty(String),
}

/// 网页抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Malformed page: {0}")]
    Malformed(String),
}

/// 抽取出的文本与标题
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub title: String,
    pub text: String,
}

/// Document Extractor Port
///
/// 按文件名后缀识别格式（txt / pdf / epub），返回纯文本
pub trait DocumentExtractorPort: Send + Sync {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

/// Web Scraper Port
///
/// 抓取网页并转为归一化纯文本
#[async_trait]
pub trait WebScraperPort: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ExtractedText, FetchError>;
}
