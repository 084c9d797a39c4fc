//! Trait abstractions for runtime output
//!
//! These traits enable testing the executor with mock implementations.

use super::SessionUpdate;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Receiver of session snapshots (the rendering surface)
#[async_trait]
pub trait UpdateSink: Send + Sync {
    async fn publish(&self, update: SessionUpdate);
}

#[async_trait]
impl<T: UpdateSink + ?Sized> UpdateSink for Arc<T> {
    async fn publish(&self, update: SessionUpdate) {
        (**self).publish(update).await;
    }
}

// ============================================================================
// Production implementation
// ============================================================================

/// Fans updates out to any number of subscribers
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<SessionUpdate>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl UpdateSink for BroadcastSink {
    async fn publish(&self, update: SessionUpdate) {
        if self.tx.send(update).is_err() {
            tracing::trace!("No subscribers for session update");
        }
    }
}
