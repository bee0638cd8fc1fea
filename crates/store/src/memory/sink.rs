//! Reference notification sinks.

use async_trait::async_trait;
use tokio::sync::Mutex;

use apflow_core::error::CoreError;
use apflow_core::notification::NotificationInstruction;

use crate::traits::NotificationSink;

/// Sink that records every instruction; used by tests to assert on
/// emitted notifications.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<NotificationInstruction>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn delivered(&self) -> Vec<NotificationInstruction> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, instruction: NotificationInstruction) -> Result<(), CoreError> {
        self.delivered.lock().await.push(instruction);
        Ok(())
    }
}

/// Sink that logs each instruction. Stands in for the external dispatcher
/// when none is wired up.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, instruction: NotificationInstruction) -> Result<(), CoreError> {
        tracing::info!(
            recipient_id = instruction.recipient_id,
            category = %instruction.category,
            subject = %instruction.subject,
            "Notification instruction emitted"
        );
        Ok(())
    }
}
