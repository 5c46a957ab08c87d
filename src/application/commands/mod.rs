//! Application Commands - CQRS 命令侧

pub mod handlers;
pub mod narration_commands;

pub use handlers::{
    BeginNarrationHandler, PauseHandler, ReadDocumentHandler, ResumeHandler, ScrapePageHandler,
};
pub use narration_commands::{
    BeginNarrationCommand, BeginNarrationResponse, PauseCommand, PauseResponse,
    ReadDocumentCommand, ResumeCommand, ResumeResponse, ScrapePageCommand,
};
