//! 文本来源适配器：文档抽取、网页抓取

pub mod document;
pub mod scraper;

pub use document::DocumentExtractor;
pub use scraper::{WebScraper, WebScraperConfig};
