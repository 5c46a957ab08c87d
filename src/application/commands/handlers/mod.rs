//! Command Handlers

mod ingest_handlers;
mod narration_handlers;

pub use ingest_handlers::{ReadDocumentHandler, ScrapePageHandler};
pub use narration_handlers::{BeginNarrationHandler, PauseHandler, ResumeHandler};
