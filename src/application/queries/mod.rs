//! Application Queries - CQRS 查询侧

pub mod handlers;
pub mod narration_queries;

pub use handlers::GetNarrationStatusHandler;
pub use narration_queries::{GetNarrationStatusQuery, NarrationStatusView};
