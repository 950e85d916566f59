//! In-memory ProcessStore implementation.
//!
//! Non-durable: records live as long as the store. Each operation holds the
//! write lock for its whole duration, so it is atomic with respect to every
//! other operation on the same store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::process_store::Result;
use crate::interfaces::{PersistedProcess, ProcessStore};
use crate::process::CorrelationId;

/// Process store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryProcessStore {
    processes: RwLock<HashMap<CorrelationId, PersistedProcess>>,
}

impl InMemoryProcessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored processes.
    pub async fn stored_count(&self) -> usize {
        self.processes.read().await.len()
    }

    /// Whether a record exists for `correlation_id`.
    pub async fn contains(&self, correlation_id: CorrelationId) -> bool {
        self.processes.read().await.contains_key(&correlation_id)
    }
}

#[async_trait]
impl ProcessStore for InMemoryProcessStore {
    async fn find(&self, correlation_id: CorrelationId) -> Result<Option<PersistedProcess>> {
        let store = self.processes.read().await;
        Ok(store.get(&correlation_id).cloned())
    }

    async fn save(&self, process: &PersistedProcess) -> Result<()> {
        self.processes
            .write()
            .await
            .insert(process.correlation_id, process.clone());
        Ok(())
    }

    async fn complete(&self, correlation_id: CorrelationId) -> Result<()> {
        self.processes.write().await.remove(&correlation_id);
        Ok(())
    }
}
