//! 朗读会话聚合
//!
//! 一次进行中的朗读的内存状态：不可变的句子序列、游标、播放标志。
//! 游标只由 Playback Driver 推进；播放标志只由控制面翻转。
//! 暂停等待用 Notify 显式唤醒，驱动器不做忙轮询。

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

/// 朗读会话
///
/// 不变量: `0 <= cursor <= units.len()`；`cursor == units.len()` 表示朗读完成。
pub struct NarrationSession {
    listener_id: String,
    source_title: String,
    units: Vec<String>,
    cursor: AtomicUsize,
    playing: AtomicBool,
    wake: Notify,
}

impl NarrationSession {
    /// 创建新会话（游标归零，立即进入播放状态）
    pub fn new(
        listener_id: impl Into<String>,
        source_title: impl Into<String>,
        units: Vec<String>,
    ) -> Self {
        Self::restore(listener_id, source_title, units, 0)
    }

    /// 从保存的进度恢复会话
    ///
    /// 游标越界时收敛到 `units.len()`（视为已完成）。
    pub fn restore(
        listener_id: impl Into<String>,
        source_title: impl Into<String>,
        units: Vec<String>,
        cursor: usize,
    ) -> Self {
        let cursor = cursor.min(units.len());
        Self {
            listener_id: listener_id.into(),
            source_title: source_title.into(),
            units,
            cursor: AtomicUsize::new(cursor),
            playing: AtomicBool::new(true),
            wake: Notify::new(),
        }
    }

    pub fn listener_id(&self) -> &str {
        &self.listener_id
    }

    pub fn source_title(&self) -> &str {
        &self.source_title
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn total_units(&self) -> usize {
        self.units.len()
    }

    /// 当前游标：下一个要合成/播放的句子下标
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// 朗读是否已走完全部句子
    pub fn is_complete(&self) -> bool {
        self.cursor() >= self.units.len()
    }

    /// 推进游标一格（只由驱动器在一个句子播放完成后调用）
    ///
    /// 返回推进后的游标值。
    pub fn advance(&self) -> usize {
        let next = self.cursor.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(next <= self.units.len());
        next
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// 请求暂停：驱动器在下一个轮询边界停下，不丢失进行中句子的完成记账
    pub fn pause(&self) {
        self.playing.store(false, Ordering::Release);
    }

    /// 恢复播放并唤醒挂起中的驱动器
    pub fn resume_playing(&self) {
        self.playing.store(true, Ordering::Release);
        self.wake.notify_waiters();
    }

    /// 挂起直到播放标志重新变为 true
    ///
    /// 先建立 Notify 订阅再检查标志，避免唤醒丢失。
    pub async fn wait_until_playing(&self) {
        loop {
            let notified = self.wake.notified();
            if self.is_playing() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_session_starts_playing_at_zero() {
        let session = NarrationSession::new("l1", "Title", vec!["A.".into(), "B.".into()]);
        assert_eq!(session.cursor(), 0);
        assert!(session.is_playing());
        assert!(!session.is_complete());
    }

    #[test]
    fn test_cursor_bounds_hold_through_advance() {
        let session = NarrationSession::new("l1", "Title", vec!["A.".into(), "B.".into()]);
        assert!(session.cursor() <= session.total_units());
        session.advance();
        assert!(session.cursor() <= session.total_units());
        session.advance();
        assert_eq!(session.cursor(), session.total_units());
        assert!(session.is_complete());
    }

    #[test]
    fn test_restore_clamps_out_of_range_cursor() {
        let session = NarrationSession::restore("l1", "Title", vec!["A.".into()], 9);
        assert_eq!(session.cursor(), 1);
        assert!(session.is_complete());
    }

    #[test]
    fn test_pause_is_idempotent_on_cursor() {
        let session = NarrationSession::new("l1", "Title", vec!["A.".into(), "B.".into()]);
        session.advance();
        session.pause();
        let cursor_after_first = session.cursor();
        session.pause();
        assert_eq!(session.cursor(), cursor_after_first);
        assert!(!session.is_playing());
    }

    #[tokio::test]
    async fn test_wait_until_playing_wakes_on_resume() {
        let session = Arc::new(NarrationSession::new("l1", "Title", vec!["A.".into()]));
        session.pause();

        let waiter = {
            let session = session.clone();
            tokio::spawn(async move {
                session.wait_until_playing().await;
            })
        };

        // 驱动器应当挂起而不是返回
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        session.resume_playing();
        waiter.await.unwrap();
        assert!(session.is_playing());
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_already_playing() {
        let session = NarrationSession::new("l1", "Title", vec!["A.".into()]);
        // 不需要任何通知即可返回
        session.wait_until_playing().await;
    }
}
