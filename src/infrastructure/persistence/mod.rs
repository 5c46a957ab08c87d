//! Persistence - 持久化层

pub mod sled;
