//! TTS 客户端适配器

pub mod fake_tts_client;
pub mod http_tts_client;
pub mod piper_tts_client;

pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig};
pub use http_tts_client::{HttpTtsClient, HttpTtsClientConfig};
pub use piper_tts_client::{PiperTtsClient, PiperTtsClientConfig};
