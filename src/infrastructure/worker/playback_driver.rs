//! Playback Driver - 朗读状态机
//!
//! 每个活动会话一个可取消的长任务：逐句合成 -> 播放 -> 推进游标。
//! 顺序保证：第 i 句的播放结束（或被放弃）之前绝不开始合成第 i+1 句。
//! 暂停时挂在会话的唤醒通知上，不做忙轮询。

use std::sync::Arc;

use crate::application::ports::{PlayOutcome, TransportPort, TtsEnginePort};
use crate::domain::NarrationSession;
use crate::infrastructure::events::EventPublisher;

/// 驱动器配置
#[derive(Debug, Clone)]
pub struct PlaybackDriverConfig {
    /// 连续合成失败多少次后放弃整个会话
    pub max_consecutive_failures: u32,
}

impl Default for PlaybackDriverConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 3,
        }
    }
}

/// 驱动循环的退出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// 所有句子播放完毕
    Completed,
    /// 传输在播放中断开；游标冻结在被打断的句子上
    Disconnected,
    /// 连续合成失败达到阈值，会话致命中止
    Aborted,
}

/// 朗读驱动器
///
/// 消费一个 NarrationSession，顺序推进到完成、断开或致命失败为止
pub struct PlaybackDriver {
    config: PlaybackDriverConfig,
    tts_engine: Arc<dyn TtsEnginePort>,
    transport: Arc<dyn TransportPort>,
    event_publisher: Arc<EventPublisher>,
}

impl PlaybackDriver {
    pub fn new(
        config: PlaybackDriverConfig,
        tts_engine: Arc<dyn TtsEnginePort>,
        transport: Arc<dyn TransportPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            config,
            tts_engine,
            transport,
            event_publisher,
        }
    }

    /// 驱动一个会话直到退出
    ///
    /// 取消安全：所有挂起点都在游标推进之前或之后，游标推进本身是
    /// 单个原子操作；任务在任意挂起点被 abort 都不会留下半推进的游标。
    pub async fn drive(&self, session: Arc<NarrationSession>) -> DriveOutcome {
        let listener_id = session.listener_id().to_string();
        let source_title = session.source_title().to_string();
        let mut consecutive_failures = 0u32;

        tracing::debug!(
            listener_id = %listener_id,
            source_title = %source_title,
            cursor = session.cursor(),
            total_units = session.total_units(),
            "Playback driver started"
        );

        while !session.is_complete() {
            // 暂停：挂起直到标志翻回 true（或任务被取消）
            if !session.is_playing() {
                session.wait_until_playing().await;
                continue;
            }

            let index = session.cursor();
            let unit = &session.units()[index];

            // 合成（单次尝试）
            let clip = match self.tts_engine.synthesize(unit).await {
                Ok(clip) => {
                    consecutive_failures = 0;
                    clip
                }
                Err(e) => {
                    consecutive_failures += 1;
                    tracing::warn!(
                        listener_id = %listener_id,
                        unit_index = index,
                        consecutive_failures = consecutive_failures,
                        error = %e,
                        "Unit synthesis failed"
                    );
                    self.event_publisher.publish_unit_failed(
                        &listener_id,
                        &source_title,
                        index,
                        &e.to_string(),
                    );

                    if consecutive_failures >= self.config.max_consecutive_failures {
                        // 致命中止：游标停在最后一个失败的句子上
                        tracing::error!(
                            listener_id = %listener_id,
                            unit_index = index,
                            "Consecutive synthesis failures reached limit, aborting narration"
                        );
                        self.event_publisher.publish_fatal(
                            &listener_id,
                            &source_title,
                            index,
                            &e.to_string(),
                        );
                        self.transport.disconnect(&listener_id).await;
                        return DriveOutcome::Aborted;
                    }

                    // 跳过这个句子继续
                    session.advance();
                    continue;
                }
            };

            // 播放：等待完成或断开的单一信号
            match self.transport.play(&listener_id, clip).await {
                Ok(PlayOutcome::Completed) => {
                    // 播放结束与推进之间没有挂起点，完成记账不会被取消打断
                    let next = session.advance();
                    tracing::debug!(
                        listener_id = %listener_id,
                        unit_index = index,
                        cursor = next,
                        "Unit playback completed"
                    );
                }
                Ok(PlayOutcome::Disconnected) => {
                    // 被打断的句子不计完成，恢复时重新合成
                    tracing::info!(
                        listener_id = %listener_id,
                        unit_index = index,
                        "Transport disconnected mid-unit, cursor frozen"
                    );
                    self.event_publisher
                        .publish_disconnected(&listener_id, &source_title, index);
                    return DriveOutcome::Disconnected;
                }
                Err(e) => {
                    // 传输故障等同断开：游标冻结在被打断的句子上
                    tracing::warn!(
                        listener_id = %listener_id,
                        unit_index = index,
                        error = %e,
                        "Transport failure during playback, treating as disconnect"
                    );
                    self.event_publisher
                        .publish_disconnected(&listener_id, &source_title, index);
                    return DriveOutcome::Disconnected;
                }
            }
        }

        // 游标走满：完成，释放传输，不写快照（没有可恢复的东西）
        self.transport.disconnect(&listener_id).await;
        self.event_publisher
            .publish_completed(&listener_id, &source_title, session.total_units());
        tracing::info!(
            listener_id = %listener_id,
            source_title = %source_title,
            total_units = session.total_units(),
            "Narration completed"
        );
        DriveOutcome::Completed
    }
}
