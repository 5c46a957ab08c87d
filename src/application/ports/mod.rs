//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod progress_store;
mod registry;
mod text_source;
mod transport;
mod tts_engine;

pub use progress_store::{ProgressStoreError, ProgressStorePort, SavedProgress};
pub use registry::{NarrationRegistryPort, RegistryError, SessionHandle};
pub use text_source::{
    DocumentExtractorPort, ExtractedText, ExtractionError, FetchError, WebScraperPort,
};
pub use transport::{PlayOutcome, TransportError, TransportPort};
pub use tts_engine::{AudioClip, SynthesisError, TtsEnginePort};
