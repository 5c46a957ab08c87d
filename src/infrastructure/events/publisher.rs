//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum NarrationEvent {
    /// 朗读开始
    Started {
        listener_id: String,
        source_title: String,
        cursor: usize,
        total_units: usize,
    },
    /// 朗读暂停（进度已落盘）
    Paused {
        listener_id: String,
        source_title: String,
        cursor: usize,
        total_units: usize,
    },
    /// 朗读恢复
    Resumed {
        listener_id: String,
        source_title: String,
        cursor: usize,
        total_units: usize,
    },
    /// 全部句子播放完毕
    Completed {
        listener_id: String,
        source_title: String,
        total_units: usize,
    },
    /// 传输在播放中断开
    Disconnected {
        listener_id: String,
        source_title: String,
        unit_index: usize,
    },
    /// 单句合成失败（已跳过）
    UnitFailed {
        listener_id: String,
        source_title: String,
        unit_index: usize,
        error: String,
    },
    /// 连续失败达到阈值，会话中止
    Fatal {
        listener_id: String,
        source_title: String,
        unit_index: usize,
        error: String,
    },
}

/// 事件发布器
///
/// listener_id -> broadcast sender，WebSocket 处理器按监听者订阅
pub struct EventPublisher {
    channels: DashMap<String, broadcast::Sender<NarrationEvent>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 注册监听者的事件通道
    pub fn register_listener(&self, listener_id: &str) -> broadcast::Receiver<NarrationEvent> {
        if let Some(sender) = self.channels.get(listener_id) {
            return sender.subscribe();
        }

        let (tx, rx) = broadcast::channel(100);
        self.channels.insert(listener_id.to_string(), tx);
        rx
    }

    /// 取消注册监听者
    pub fn unregister_listener(&self, listener_id: &str) {
        self.channels.remove(listener_id);
    }

    /// 获取监听者的事件接收器
    pub fn subscribe(&self, listener_id: &str) -> Option<broadcast::Receiver<NarrationEvent>> {
        self.channels.get(listener_id).map(|s| s.subscribe())
    }

    /// 发布朗读开始事件
    pub fn publish_started(
        &self,
        listener_id: &str,
        source_title: &str,
        cursor: usize,
        total_units: usize,
    ) {
        self.publish_to_listener(
            listener_id,
            NarrationEvent::Started {
                listener_id: listener_id.to_string(),
                source_title: source_title.to_string(),
                cursor,
                total_units,
            },
        );
    }

    /// 发布暂停事件
    pub fn publish_paused(
        &self,
        listener_id: &str,
        source_title: &str,
        cursor: usize,
        total_units: usize,
    ) {
        self.publish_to_listener(
            listener_id,
            NarrationEvent::Paused {
                listener_id: listener_id.to_string(),
                source_title: source_title.to_string(),
                cursor,
                total_units,
            },
        );
    }

    /// 发布恢复事件
    pub fn publish_resumed(
        &self,
        listener_id: &str,
        source_title: &str,
        cursor: usize,
        total_units: usize,
    ) {
        self.publish_to_listener(
            listener_id,
            NarrationEvent::Resumed {
                listener_id: listener_id.to_string(),
                source_title: source_title.to_string(),
                cursor,
                total_units,
            },
        );
    }

    /// 发布完成事件
    pub fn publish_completed(&self, listener_id: &str, source_title: &str, total_units: usize) {
        self.publish_to_listener(
            listener_id,
            NarrationEvent::Completed {
                listener_id: listener_id.to_string(),
                source_title: source_title.to_string(),
                total_units,
            },
        );
    }

    /// 发布断开事件
    pub fn publish_disconnected(&self, listener_id: &str, source_title: &str, unit_index: usize) {
        self.publish_to_listener(
            listener_id,
            NarrationEvent::Disconnected {
                listener_id: listener_id.to_string(),
                source_title: source_title.to_string(),
                unit_index,
            },
        );
    }

    /// 发布单句合成失败事件
    pub fn publish_unit_failed(
        &self,
        listener_id: &str,
        source_title: &str,
        unit_index: usize,
        error: &str,
    ) {
        self.publish_to_listener(
            listener_id,
            NarrationEvent::UnitFailed {
                listener_id: listener_id.to_string(),
                source_title: source_title.to_string(),
                unit_index,
                error: error.to_string(),
            },
        );
    }

    /// 发布致命中止事件
    pub fn publish_fatal(
        &self,
        listener_id: &str,
        source_title: &str,
        unit_index: usize,
        error: &str,
    ) {
        self.publish_to_listener(
            listener_id,
            NarrationEvent::Fatal {
                listener_id: listener_id.to_string(),
                source_title: source_title.to_string(),
                unit_index,
                error: error.to_string(),
            },
        );
    }

    /// 发布事件到指定监听者
    fn publish_to_listener(&self, listener_id: &str, event: NarrationEvent) {
        if let Some(sender) = self.channels.get(listener_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    listener_id = %listener_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registered_listener_receives_events() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.register_listener("l1");

        publisher.publish_started("l1", "Book", 0, 5);

        let event = rx.recv().await.unwrap();
        match event {
            NarrationEvent::Started {
                listener_id,
                total_units,
                ..
            } => {
                assert_eq!(listener_id, "l1");
                assert_eq!(total_units, 5);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_events_do_not_cross_listeners() {
        let publisher = EventPublisher::new();
        let mut rx1 = publisher.register_listener("l1");
        let _rx2 = publisher.register_listener("l2");

        publisher.publish_completed("l2", "Book", 3);
        publisher.publish_completed("l1", "Other", 7);

        let event = rx1.recv().await.unwrap();
        match event {
            NarrationEvent::Completed { source_title, .. } => {
                assert_eq!(source_title, "Other");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_publish_without_channel_is_noop() {
        let publisher = EventPublisher::new();
        // 没有注册过的监听者：静默丢弃
        publisher.publish_paused("ghost", "Book", 1, 2);
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = NarrationEvent::UnitFailed {
            listener_id: "l1".to_string(),
            source_title: "Book".to_string(),
            unit_index: 4,
            error: "timeout".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "UnitFailed");
        assert_eq!(json["data"]["unit_index"], 4);
    }
}
