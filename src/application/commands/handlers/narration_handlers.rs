//! Narration Command Handlers - 控制面核心命令

use std::sync::Arc;

use crate::application::commands::narration_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::NarrationRegistryPort;
use crate::domain::segmenter;

/// Begin Handler - 切分文本并注册新会话
pub struct BeginNarrationHandler {
    registry: Arc<dyn NarrationRegistryPort>,
}

impl BeginNarrationHandler {
    pub fn new(registry: Arc<dyn NarrationRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        cmd: BeginNarrationCommand,
    ) -> Result<BeginNarrationResponse, ApplicationError> {
        let units = segmenter::segment(&cmd.text);
        if units.is_empty() {
            return Err(ApplicationError::validation(format!(
                "Source contains no narratable text: {}",
                cmd.source_title
            )));
        }

        let handle = self
            .registry
            .start(&cmd.listener_id, &cmd.source_title, units)
            .await?;

        tracing::info!(
            listener_id = %cmd.listener_id,
            source_title = %handle.source_title,
            total_units = handle.total_units,
            "Narration begun"
        );

        Ok(BeginNarrationResponse {
            listener_id: handle.listener_id,
            summary: format!(
                "Now narrating \"{}\" ({} sentences)",
                handle.source_title, handle.total_units
            ),
            source_title: handle.source_title,
            total_units: handle.total_units,
        })
    }
}

/// Pause Handler - 暂停并写检查点
pub struct PauseHandler {
    registry: Arc<dyn NarrationRegistryPort>,
}

impl PauseHandler {
    pub fn new(registry: Arc<dyn NarrationRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: PauseCommand) -> Result<PauseResponse, ApplicationError> {
        let saved = self.registry.stop(&cmd.listener_id).await?;

        tracing::info!(
            listener_id = %cmd.listener_id,
            source_title = %saved.source_title,
            cursor = saved.cursor,
            "Narration paused and checkpointed"
        );

        Ok(PauseResponse {
            listener_id: cmd.listener_id,
            summary: format!(
                "Paused \"{}\" at sentence {}/{}",
                saved.source_title,
                saved.cursor,
                saved.units.len()
            ),
            source_title: saved.source_title,
            cursor: saved.cursor,
            total_units: saved.units.len(),
        })
    }
}

/// Resume Handler - 从检查点恢复朗读
pub struct ResumeHandler {
    registry: Arc<dyn NarrationRegistryPort>,
}

impl ResumeHandler {
    pub fn new(registry: Arc<dyn NarrationRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: ResumeCommand) -> Result<ResumeResponse, ApplicationError> {
        let handle = self.registry.resume(&cmd.listener_id).await?;

        tracing::info!(
            listener_id = %cmd.listener_id,
            source_title = %handle.source_title,
            cursor = handle.cursor,
            "Narration resumed from checkpoint"
        );

        Ok(ResumeResponse {
            listener_id: handle.listener_id,
            summary: format!(
                "Resuming \"{}\" from sentence {}/{}",
                handle.source_title, handle.cursor, handle.total_units
            ),
            source_title: handle.source_title,
            cursor: handle.cursor,
            total_units: handle.total_units,
        })
    }
}
