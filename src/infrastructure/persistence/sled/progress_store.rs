//! Sled-based Progress Store Implementation

use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{ProgressStoreError, ProgressStorePort, SavedProgress};

/// Sled 进度存储配置
#[derive(Debug, Clone)]
pub struct SledProgressStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledProgressStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/progress.sled".to_string(),
        }
    }
}

/// Sled 进度存储
///
/// 每个监听者一条记录，键为 `progress:{listener_id}`，值为 bincode
/// 序列化的 SavedProgress，save 整条覆盖。
pub struct SledProgressStore {
    db: Db,
}

impl SledProgressStore {
    pub fn new(config: &SledProgressStoreConfig) -> Result<Self, ProgressStoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| ProgressStoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            records = db.len(),
            "SledProgressStore initialized"
        );

        Ok(Self { db })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ProgressStoreError> {
        let config = SledProgressStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn key(listener_id: &str) -> String {
        format!("progress:{}", listener_id)
    }
}

#[async_trait]
impl ProgressStorePort for SledProgressStore {
    async fn save(
        &self,
        listener_id: &str,
        progress: &SavedProgress,
    ) -> Result<(), ProgressStoreError> {
        let bytes = bincode::serialize(progress)
            .map_err(|e| ProgressStoreError::SerializationError(e.to_string()))?;

        self.db
            .insert(Self::key(listener_id), bytes)
            .map_err(|e| ProgressStoreError::DatabaseError(e.to_string()))?;

        // 检查点立刻落盘，进程崩溃不回退进度
        self.db
            .flush_async()
            .await
            .map_err(|e| ProgressStoreError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            listener_id = %listener_id,
            source_title = %progress.source_title,
            cursor = progress.cursor,
            total_units = progress.units.len(),
            "Progress checkpointed"
        );
        Ok(())
    }

    async fn load(
        &self,
        listener_id: &str,
    ) -> Result<Option<SavedProgress>, ProgressStoreError> {
        match self.db.get(Self::key(listener_id)) {
            Ok(Some(bytes)) => {
                let progress: SavedProgress = bincode::deserialize(&bytes)
                    .map_err(|e| ProgressStoreError::SerializationError(e.to_string()))?;
                Ok(Some(progress))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(ProgressStoreError::DatabaseError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> SledProgressStore {
        SledProgressStore::open(dir.path().join("test.sled")).unwrap()
    }

    fn progress(title: &str, cursor: usize) -> SavedProgress {
        SavedProgress {
            source_title: title.to_string(),
            units: vec!["First.".to_string(), "Second.".to_string(), "Third.".to_string()],
            cursor,
        }
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        let saved = progress("Book", 2);
        store.save("l1", &saved).await.unwrap();

        let loaded = store.load("l1").await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.save("l1", &progress("Book A", 1)).await.unwrap();
        store.save("l1", &progress("Book B", 0)).await.unwrap();

        let loaded = store.load("l1").await.unwrap().unwrap();
        assert_eq!(loaded.source_title, "Book B");
        assert_eq!(loaded.cursor, 0);
    }

    #[tokio::test]
    async fn test_load_absent_listener_returns_none() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        assert!(store.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_are_per_listener() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.save("l1", &progress("Book A", 1)).await.unwrap();
        store.save("l2", &progress("Book B", 2)).await.unwrap();

        assert_eq!(store.load("l1").await.unwrap().unwrap().source_title, "Book A");
        assert_eq!(store.load("l2").await.unwrap().unwrap().cursor, 2);
    }
}
