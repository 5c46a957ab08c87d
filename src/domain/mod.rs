//! 领域层
//!
//! - narration: 朗读会话聚合（游标/播放标志）
//! - segmenter: 句子分割纯函数

pub mod narration;
pub mod segmenter;

pub use narration::NarrationSession;
pub use segmenter::segment;
