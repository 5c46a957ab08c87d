//! Worker - 朗读驱动任务

pub mod playback_driver;

pub use playback_driver::{DriveOutcome, PlaybackDriver, PlaybackDriverConfig};
