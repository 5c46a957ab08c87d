//! Narration Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::NarrationRegistryPort;
use crate::application::queries::narration_queries::{
    GetNarrationStatusQuery, NarrationStatusView,
};

/// Status Handler - 查询活动会话状态
pub struct GetNarrationStatusHandler {
    registry: Arc<dyn NarrationRegistryPort>,
}

impl GetNarrationStatusHandler {
    pub fn new(registry: Arc<dyn NarrationRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        query: GetNarrationStatusQuery,
    ) -> Result<NarrationStatusView, ApplicationError> {
        let view = match self.registry.status(&query.listener_id) {
            Some(handle) => NarrationStatusView {
                listener_id: query.listener_id,
                active: true,
                source_title: Some(handle.source_title),
                cursor: Some(handle.cursor),
                total_units: Some(handle.total_units),
            },
            None => NarrationStatusView {
                listener_id: query.listener_id,
                active: false,
                source_title: None,
                cursor: None,
                total_units: None,
            },
        };
        Ok(view)
    }
}
