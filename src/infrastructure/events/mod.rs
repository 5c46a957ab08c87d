//! Events - WebSocket 事件推送

pub mod publisher;

pub use publisher::{EventPublisher, NarrationEvent};
