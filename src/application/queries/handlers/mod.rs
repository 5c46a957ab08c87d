//! Query Handlers

mod narration_handlers;

pub use narration_handlers::GetNarrationStatusHandler;
