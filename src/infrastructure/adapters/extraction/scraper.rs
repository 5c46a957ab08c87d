//! Web Scraper - 网页抓取与正文抽取
//!
//! 抓取页面 HTML，<title> 作为来源标题（缺失时退回 URL），
//! 正文经 html2text 转成纯文本交给切分器。

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{ExtractedText, FetchError, WebScraperPort};

const HTML_RENDER_WIDTH: usize = 1000;

/// 抓取器配置
#[derive(Debug, Clone)]
pub struct WebScraperConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent 头
    pub user_agent: String,
}

impl Default for WebScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("lector/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// 网页抓取器
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new(config: WebScraperConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// 从 HTML 提取 <title> 内容
    fn extract_title(html: &str) -> Option<String> {
        let lower = html.to_lowercase();
        let start = lower.find("<title")?;
        let open_end = lower[start..].find('>')? + start + 1;
        let close = lower[open_end..].find("</title>")? + open_end;
        let title = html[open_end..close].trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}

#[async_trait]
impl WebScraperPort for WebScraper {
    async fn scrape(&self, url: &str) -> Result<ExtractedText, FetchError> {
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let title = Self::extract_title(&html).unwrap_or_else(|| url.to_string());
        let text = html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH);

        if text.trim().is_empty() {
            return Err(FetchError::Malformed(format!(
                "Page contains no text: {}",
                url
            )));
        }

        tracing::debug!(
            url = %url,
            title = %title,
            text_len = text.len(),
            "Page text extracted"
        );

        Ok(ExtractedText { title, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_from_html() {
        let html = "<html><head><title>My Page</title></head><body>hi</body></html>";
        assert_eq!(WebScraper::extract_title(html), Some("My Page".to_string()));
    }

    #[test]
    fn test_extract_title_with_attributes() {
        let html = r#"<title lang="en"> Spaced Title </title>"#;
        assert_eq!(
            WebScraper::extract_title(html),
            Some("Spaced Title".to_string())
        );
    }

    #[test]
    fn test_missing_or_empty_title_is_none() {
        assert_eq!(WebScraper::extract_title("<body>no title</body>"), None);
        assert_eq!(WebScraper::extract_title("<title>  </title>"), None);
    }
}
