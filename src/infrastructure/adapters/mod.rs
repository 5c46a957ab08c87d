//! Adapters - 外部系统适配器

pub mod extraction;
pub mod transport;
pub mod tts;
