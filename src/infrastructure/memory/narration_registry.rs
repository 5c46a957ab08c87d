//! In-Memory Narration Registry
//!
//! 进程级 监听者 -> 活动会话 的映射，每个监听者一个驱动任务。
//! start/stop/resume 对同一监听者通过 per-listener 互斥锁串行化；
//! 不同监听者之间完全并行。

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::application::ports::{
    NarrationRegistryPort, ProgressStorePort, RegistryError, SavedProgress, SessionHandle,
    TransportPort,
};
use crate::domain::NarrationSession;
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::worker::PlaybackDriver;

/// 注册表项：一个监听者的活动会话
struct ActiveEntry {
    session: Arc<NarrationSession>,
    task: JoinHandle<()>,
    /// 驱动任务的代次标识；任务结束时只摘除与自己同代的表项，
    /// 绝不误删已替换自己的新会话
    generation: Uuid,
}

/// In-Memory Narration Registry
pub struct InMemoryNarrationRegistry {
    entries: Arc<DashMap<String, ActiveEntry>>,
    /// per-listener 控制面互斥锁，保证 start/stop/resume 串行；
    /// 会话结束后摘除，不随见过的监听者数量无限增长
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    driver: Arc<PlaybackDriver>,
    progress_store: Arc<dyn ProgressStorePort>,
    transport: Arc<dyn TransportPort>,
    event_publisher: Arc<EventPublisher>,
}

impl InMemoryNarrationRegistry {
    pub fn new(
        driver: Arc<PlaybackDriver>,
        progress_store: Arc<dyn ProgressStorePort>,
        transport: Arc<dyn TransportPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            locks: Arc::new(DashMap::new()),
            driver,
            progress_store,
            transport,
            event_publisher,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn lock_for(&self, listener_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(listener_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 摘除没人再引用的监听者互斥锁
    ///
    /// 只在引用计数归一（仅剩表内一份）时摘除；还有任务持有或等待
    /// 这把锁时跳过，由最后一个使用者摘。
    fn prune_lock(locks: &DashMap<String, Arc<Mutex<()>>>, listener_id: &str) {
        locks.remove_if(listener_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// 摘除并拆除一个活动会话，返回拆除时的快照
    ///
    /// 顺序固定：暂停标志 -> abort 驱动任务 -> 等任务完全停止 ->
    /// 拍快照 -> 落盘 -> 释放传输。快照在任务停止之后拍，
    /// 进行中句子的完成记账要么已反映在游标里，要么恢复时重播该句，
    /// 绝不会被跳过。已播完的会话没有可恢复的东西，不写快照。
    async fn teardown(
        &self,
        listener_id: &str,
        entry: ActiveEntry,
    ) -> Result<SavedProgress, RegistryError> {
        entry.session.pause();
        entry.task.abort();
        // JoinError（Cancelled）是预期结果
        let _ = entry.task.await;

        let progress = SavedProgress::snapshot(&entry.session);
        if !entry.session.is_complete() {
            self.progress_store.save(listener_id, &progress).await?;
        }
        self.transport.disconnect(listener_id).await;
        Ok(progress)
    }

    /// 安装一个新会话：接入传输、起驱动任务、登记表项
    async fn install(
        &self,
        listener_id: &str,
        session: Arc<NarrationSession>,
    ) -> Result<SessionHandle, RegistryError> {
        self.transport.connect(listener_id).await?;

        let generation = Uuid::new_v4();
        // 表项登记完成之前驱动任务不开跑，避免短会话抢先自摘
        let (installed_tx, installed_rx) = oneshot::channel::<()>();

        let task = {
            let driver = self.driver.clone();
            let entries = self.entries.clone();
            let locks = self.locks.clone();
            let session = session.clone();
            let listener_id = listener_id.to_string();
            tokio::spawn(async move {
                if installed_rx.await.is_err() {
                    return;
                }
                // 自然退出（完成/断开/致命中止）都不自动写检查点，
                // 只有显式 stop 和破坏性 start 落盘
                let outcome = driver.drive(session).await;
                tracing::debug!(
                    listener_id = %listener_id,
                    outcome = ?outcome,
                    "Playback driver exited"
                );
                entries.remove_if(&listener_id, |_, e| e.generation == generation);
                Self::prune_lock(&locks, &listener_id);
            })
        };

        let handle = SessionHandle::of(&session);
        self.entries.insert(
            listener_id.to_string(),
            ActiveEntry {
                session,
                task,
                generation,
            },
        );
        // 表项就位，放行驱动任务
        let _ = installed_tx.send(());

        Ok(handle)
    }

    /// stop 的临界区部分（调用方持有该监听者的控制面锁）
    async fn stop_locked(&self, listener_id: &str) -> Result<SavedProgress, RegistryError> {
        let (_, entry) = self
            .entries
            .remove(listener_id)
            .ok_or_else(|| RegistryError::NotActive(listener_id.to_string()))?;

        let source_title = entry.session.source_title().to_string();
        let total_units = entry.session.total_units();
        let progress = self.teardown(listener_id, entry).await?;

        self.event_publisher.publish_paused(
            listener_id,
            &source_title,
            progress.cursor,
            total_units,
        );
        Ok(progress)
    }
}

#[async_trait]
impl NarrationRegistryPort for InMemoryNarrationRegistry {
    async fn start(
        &self,
        listener_id: &str,
        source_title: &str,
        units: Vec<String>,
    ) -> Result<SessionHandle, RegistryError> {
        let lock = self.lock_for(listener_id);
        let _guard = lock.lock().await;

        // 破坏性替换：旧会话按 stop 的语义打检查点后让位
        if let Some((_, old)) = self.entries.remove(listener_id) {
            let old_title = old.session.source_title().to_string();
            let old_total = old.session.total_units();
            let progress = self.teardown(listener_id, old).await?;
            // 旧会话的暂停事件先于新会话的开始事件；
            // 已播完的旧会话没写检查点，也就没有暂停可言
            if progress.cursor < progress.units.len() {
                self.event_publisher.publish_paused(
                    listener_id,
                    &old_title,
                    progress.cursor,
                    old_total,
                );
            }
            tracing::info!(
                listener_id = %listener_id,
                replaced_title = %old_title,
                checkpoint_cursor = progress.cursor,
                "Replaced active narration with a new source"
            );
        }

        let session = Arc::new(NarrationSession::new(listener_id, source_title, units));
        let handle = self.install(listener_id, session).await?;

        self.event_publisher.publish_started(
            listener_id,
            source_title,
            handle.cursor,
            handle.total_units,
        );
        Ok(handle)
    }

    async fn stop(&self, listener_id: &str) -> Result<SavedProgress, RegistryError> {
        let lock = self.lock_for(listener_id);
        let result = {
            let _guard = lock.lock().await;
            self.stop_locked(listener_id).await
        };
        // 锁先放回（guard 和本地 Arc 都已释放）再尝试摘除
        drop(lock);
        Self::prune_lock(&self.locks, listener_id);
        result
    }

    async fn resume(&self, listener_id: &str) -> Result<SessionHandle, RegistryError> {
        let lock = self.lock_for(listener_id);
        let _guard = lock.lock().await;

        if self.entries.contains_key(listener_id) {
            return Err(RegistryError::AlreadyActive(listener_id.to_string()));
        }

        let progress = self
            .progress_store
            .load(listener_id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(listener_id.to_string()))?;

        let session = Arc::new(NarrationSession::restore(
            listener_id,
            progress.source_title,
            progress.units,
            progress.cursor,
        ));
        let source_title = session.source_title().to_string();
        let handle = self.install(listener_id, session).await?;

        self.event_publisher.publish_resumed(
            listener_id,
            &source_title,
            handle.cursor,
            handle.total_units,
        );
        Ok(handle)
    }

    fn status(&self, listener_id: &str) -> Option<SessionHandle> {
        self.entries
            .get(listener_id)
            .map(|entry| SessionHandle::of(&entry.session))
    }

    fn is_active(&self, listener_id: &str) -> bool {
        self.entries.contains_key(listener_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        AudioClip, PlayOutcome, ProgressStoreError, SynthesisError, TransportError, TtsEnginePort,
    };
    use crate::infrastructure::events::NarrationEvent;
    use crate::infrastructure::worker::PlaybackDriverConfig;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    struct InstantTts;

    #[async_trait]
    impl TtsEnginePort for InstantTts {
        async fn synthesize(&self, unit: &str) -> Result<AudioClip, SynthesisError> {
            Ok(AudioClip {
                data: unit.as_bytes().to_vec(),
                duration_ms: Some(5),
                sample_rate: Some(22050),
            })
        }
    }

    /// 每次播放消耗一个许可；测试通过投放许可精确控制播放进度
    struct GatedTransport {
        permits: Semaphore,
    }

    impl GatedTransport {
        fn new() -> Self {
            Self {
                permits: Semaphore::new(0),
            }
        }

        fn allow(&self, n: usize) {
            self.permits.add_permits(n);
        }
    }

    #[async_trait]
    impl TransportPort for GatedTransport {
        async fn connect(&self, _listener_id: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn play(
            &self,
            _listener_id: &str,
            _clip: AudioClip,
        ) -> Result<PlayOutcome, TransportError> {
            let permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| TransportError::PlaybackFailed(e.to_string()))?;
            permit.forget();
            Ok(PlayOutcome::Completed)
        }

        async fn disconnect(&self, _listener_id: &str) {}
    }

    struct MemoryProgressStore {
        records: DashMap<String, SavedProgress>,
    }

    impl MemoryProgressStore {
        fn new() -> Self {
            Self {
                records: DashMap::new(),
            }
        }
    }

    #[async_trait]
    impl ProgressStorePort for MemoryProgressStore {
        async fn save(
            &self,
            listener_id: &str,
            progress: &SavedProgress,
        ) -> Result<(), ProgressStoreError> {
            self.records
                .insert(listener_id.to_string(), progress.clone());
            Ok(())
        }

        async fn load(
            &self,
            listener_id: &str,
        ) -> Result<Option<SavedProgress>, ProgressStoreError> {
            Ok(self.records.get(listener_id).map(|r| r.clone()))
        }
    }

    struct Harness {
        registry: InMemoryNarrationRegistry,
        transport: Arc<GatedTransport>,
        store: Arc<MemoryProgressStore>,
        events: Arc<EventPublisher>,
    }

    fn harness() -> Harness {
        let transport = Arc::new(GatedTransport::new());
        let store = Arc::new(MemoryProgressStore::new());
        let events = Arc::new(EventPublisher::new());
        let driver = Arc::new(PlaybackDriver::new(
            PlaybackDriverConfig::default(),
            Arc::new(InstantTts),
            transport.clone(),
            events.clone(),
        ));
        let registry = InMemoryNarrationRegistry::new(
            driver,
            store.clone(),
            transport.clone(),
            events.clone(),
        );
        Harness {
            registry,
            transport,
            store,
            events,
        }
    }

    fn units(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Unit {i}.")).collect()
    }

    async fn wait_for_cursor(registry: &InMemoryNarrationRegistry, listener_id: &str, at: usize) {
        for _ in 0..200 {
            if let Some(handle) = registry.status(listener_id) {
                if handle.cursor >= at {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("cursor never reached {at}");
    }

    #[tokio::test]
    async fn test_pause_checkpoints_cursor_and_resume_continues() {
        // 播完前 2 句后暂停 -> 快照 cursor=2，
        // resume 从第 2 句继续
        let h = harness();
        let handle = h.registry.start("l1", "Book", units(5)).await.unwrap();
        assert_eq!(handle.cursor, 0);
        assert_eq!(handle.total_units, 5);

        h.transport.allow(2);
        wait_for_cursor(&h.registry, "l1", 2).await;

        let progress = h.registry.stop("l1").await.unwrap();
        assert_eq!(progress.cursor, 2);
        assert_eq!(progress.source_title, "Book");
        assert_eq!(progress.units.len(), 5);
        assert!(!h.registry.is_active("l1"));

        let resumed = h.registry.resume("l1").await.unwrap();
        assert_eq!(resumed.cursor, 2);
        assert_eq!(resumed.source_title, "Book");

        // 放行剩余 3 句，会话完成并自摘
        h.transport.allow(3);
        for _ in 0..200 {
            if !h.registry.is_active("l1") {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session never completed");
    }

    #[tokio::test]
    async fn test_start_replaces_active_session_with_checkpoint() {
        // 朗读 A 进行中再 start B -> A 的进度落盘，B 从 0 开始
        let h = harness();
        let mut rx = h.events.register_listener("l1");

        h.registry.start("l1", "Book A", units(4)).await.unwrap();
        h.transport.allow(1);
        wait_for_cursor(&h.registry, "l1", 1).await;

        let handle = h.registry.start("l1", "Book B", units(3)).await.unwrap();
        assert_eq!(handle.source_title, "Book B");
        assert_eq!(handle.cursor, 0);

        let saved = h.store.load("l1").await.unwrap().unwrap();
        assert_eq!(saved.source_title, "Book A");
        assert_eq!(saved.cursor, 1);

        // 事件顺序：A 开始 -> A 暂停（带检查点游标） -> B 开始
        match rx.recv().await.unwrap() {
            NarrationEvent::Started { source_title, .. } => assert_eq!(source_title, "Book A"),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            NarrationEvent::Paused {
                source_title,
                cursor,
                ..
            } => {
                assert_eq!(source_title, "Book A");
                assert_eq!(cursor, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            NarrationEvent::Started { source_title, .. } => assert_eq!(source_title, "Book B"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_teardown_of_completed_session_writes_no_snapshot() {
        // 已播完但任务尚未自摘的会话被替换时不写快照
        let h = harness();
        let session = Arc::new(NarrationSession::restore("l1", "Book", units(2), 2));
        let entry = ActiveEntry {
            session,
            task: tokio::spawn(async {}),
            generation: Uuid::new_v4(),
        };

        let progress = h.registry.teardown("l1", entry).await.unwrap();
        assert_eq!(progress.cursor, 2);
        assert!(h.store.load("l1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stop_without_active_session_is_not_active() {
        let h = harness();
        let err = h.registry.stop("nobody").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotActive(_)));
    }

    #[tokio::test]
    async fn test_resume_without_saved_progress_is_not_found() {
        let h = harness();
        let err = h.registry.resume("nobody").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resume_while_active_is_already_active() {
        let h = harness();
        h.registry.start("l1", "Book", units(3)).await.unwrap();
        let err = h.registry.resume("l1").await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyActive(_)));
    }

    #[tokio::test]
    async fn test_status_reflects_active_session() {
        let h = harness();
        assert!(h.registry.status("l1").is_none());

        h.registry.start("l1", "Book", units(3)).await.unwrap();
        let handle = h.registry.status("l1").unwrap();
        assert_eq!(handle.listener_id, "l1");
        assert_eq!(handle.source_title, "Book");
        assert!(handle.playing);
    }

    #[tokio::test]
    async fn test_completed_session_deregisters_itself() {
        let h = harness();
        h.registry.start("l1", "Book", units(2)).await.unwrap();
        h.transport.allow(2);

        for _ in 0..200 {
            if !h.registry.is_active("l1") && h.registry.locks.is_empty() {
                // 完成的会话不写快照，控制面锁一并摘除
                assert!(h.store.load("l1").await.unwrap().is_none());
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session never deregistered");
    }

    #[tokio::test]
    async fn test_stop_prunes_control_lock() {
        let h = harness();
        h.registry.start("l1", "Book", units(3)).await.unwrap();
        h.transport.allow(1);
        wait_for_cursor(&h.registry, "l1", 1).await;

        h.registry.stop("l1").await.unwrap();
        assert!(h.registry.locks.is_empty());
    }
}
