//! Sled 持久化实现

pub mod progress_store;

pub use progress_store::{SledProgressStore, SledProgressStoreConfig};
