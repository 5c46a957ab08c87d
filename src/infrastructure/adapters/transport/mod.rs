//! 传输适配器

pub mod paced;

pub use paced::{PacedTransport, PacedTransportConfig};
