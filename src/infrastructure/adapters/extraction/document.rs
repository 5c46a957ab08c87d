//! Document Extractor - 上传文档的纯文本抽取
//!
//! 按文件名后缀识别格式：txt 直接解码，pdf 走 pdf-extract，
//! epub 按 spine 顺序拼接章节并转纯文本。标题取文件名主干，
//! epub 有元数据标题时优先。

use std::io::Cursor;
use std::path::Path;

use crate::application::ports::{DocumentExtractorPort, ExtractedText, ExtractionError};

/// HTML 转纯文本的折行宽度；只影响中间表示，切分前会整体归一化
const HTML_RENDER_WIDTH: usize = 1000;

/// 标准文档抽取器
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_txt(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    fn extract_pdf(filename: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Malformed(format!("{}: {}", filename, e)))
    }

    /// epub：按 spine 顺序抽取全部章节
    ///
    /// 返回 (正文, 元数据标题)
    fn extract_epub(
        filename: &str,
        bytes: &[u8],
    ) -> Result<(String, Option<String>), ExtractionError> {
        let mut doc = epub::doc::EpubDoc::from_reader(Cursor::new(bytes.to_vec()))
            .map_err(|e| ExtractionError::Malformed(format!("{}: {}", filename, e)))?;

        let title = doc.mdata("title").map(|m| m.value.clone());

        let mut text = String::new();
        let spine = doc.spine.clone();
        for spine_item in spine.iter() {
            if let Some((content_bytes, _mime)) = doc.get_resource(&spine_item.idref) {
                let html = String::from_utf8_lossy(&content_bytes).to_string();
                let chapter = html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH);
                if chapter.trim().is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    text.push_str("\n\n");
                }
                text.push_str(&chapter);
            }
        }

        Ok((text, title))
    }

    /// 文件名主干作为回退标题
    fn stem_title(filename: &str) -> String {
        Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.to_string())
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractorPort for DocumentExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let extension = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let (text, title) = match extension.as_str() {
            "txt" => (Self::extract_txt(bytes), None),
            "pdf" => (Self::extract_pdf(filename, bytes)?, None),
            "epub" => Self::extract_epub(filename, bytes)?,
            other => {
                return Err(ExtractionError::UnsupportedFormat(format!(
                    "{} (.{})",
                    filename, other
                )))
            }
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::Empty(filename.to_string()));
        }

        let title = title.unwrap_or_else(|| Self::stem_title(filename));

        tracing::debug!(
            filename = %filename,
            title = %title,
            text_len = text.len(),
            "Document text extracted"
        );

        Ok(ExtractedText { title, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_extraction_uses_filename_stem_as_title() {
        let extractor = DocumentExtractor::new();
        let result = extractor
            .extract("moby_dick.txt", "Call me Ishmael.".as_bytes())
            .unwrap();
        assert_eq!(result.title, "moby_dick");
        assert_eq!(result.text, "Call me Ishmael.");
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let extractor = DocumentExtractor::new();
        let err = extractor.extract("notes.docx", b"whatever").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        let extractor = DocumentExtractor::new();
        let err = extractor.extract("README", b"text").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_whitespace_only_document_is_empty() {
        let extractor = DocumentExtractor::new();
        let err = extractor.extract("blank.txt", b"  \n\t  ").unwrap_err();
        assert!(matches!(err, ExtractionError::Empty(_)));
    }

    #[test]
    fn test_malformed_pdf_is_rejected() {
        let extractor = DocumentExtractor::new();
        let err = extractor.extract("broken.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn test_malformed_epub_is_rejected() {
        let extractor = DocumentExtractor::new();
        let err = extractor.extract("broken.epub", b"not a zip").unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let extractor = DocumentExtractor::new();
        let result = extractor.extract("UPPER.TXT", b"Some text.").unwrap();
        assert_eq!(result.text, "Some text.");
    }
}
