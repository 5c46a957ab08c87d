//! Narration Commands - 控制面命令定义

/// 开始朗读（文本已就绪）
#[derive(Debug, Clone)]
pub struct BeginNarrationCommand {
    pub listener_id: String,
    pub source_title: String,
    pub text: String,
}

/// 朗读上传的文档
#[derive(Debug, Clone)]
pub struct ReadDocumentCommand {
    pub listener_id: String,
    pub filename: String,
    pub data: Vec<u8>,
}

/// 朗读抓取的网页
#[derive(Debug, Clone)]
pub struct ScrapePageCommand {
    pub listener_id: String,
    pub url: String,
}

/// 暂停（写检查点并释放传输）
#[derive(Debug, Clone)]
pub struct PauseCommand {
    pub listener_id: String,
}

/// 从检查点恢复
#[derive(Debug, Clone)]
pub struct ResumeCommand {
    pub listener_id: String,
}

/// begin/read/scrape 的统一响应
#[derive(Debug, Clone)]
pub struct BeginNarrationResponse {
    pub listener_id: String,
    pub source_title: String,
    pub total_units: usize,
    pub summary: String,
}

/// pause 的响应
#[derive(Debug, Clone)]
pub struct PauseResponse {
    pub listener_id: String,
    pub source_title: String,
    pub cursor: usize,
    pub total_units: usize,
    pub summary: String,
}

/// resume 的响应
#[derive(Debug, Clone)]
pub struct ResumeResponse {
    pub listener_id: String,
    pub source_title: String,
    pub cursor: usize,
    pub total_units: usize,
    pub summary: String,
}
