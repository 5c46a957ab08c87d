//! HTTP Handlers

mod ingest;
mod narration;
mod ping;
mod websocket;

pub use ingest::{read_document, scrape_page};
pub use narration::{begin_narration, narration_status, pause_narration, resume_narration};
pub use ping::ping;
pub use websocket::websocket_handler;
