//! Memory - 进程内会话注册表

pub mod narration_registry;

pub use narration_registry::InMemoryNarrationRegistry;
