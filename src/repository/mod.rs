//! Process repository.
//!
//! Typed facade over a [`ProcessStore`]: pairs stored blobs with their
//! process data type through a [`Serializer`].

use std::sync::Arc;

use tracing::debug;

use crate::interfaces::{
    PersistedProcess, PersistenceError, ProcessStore, SerializationError, Serializer,
};
use crate::process::{CorrelationId, ProcessData, ProcessInstance};
use crate::serialization::{from_blob, to_blob, JsonSerializer};

/// Errors raised by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Repository for process instances.
#[derive(Clone)]
pub struct ProcessRepository {
    store: Arc<dyn ProcessStore>,
    serializer: Arc<dyn Serializer>,
}

impl ProcessRepository {
    /// Create a repository that stores JSON blobs.
    pub fn new(store: Arc<dyn ProcessStore>) -> Self {
        Self::with_serializer(store, Arc::new(JsonSerializer))
    }

    /// Create a repository with an explicit blob serializer.
    pub fn with_serializer(store: Arc<dyn ProcessStore>, serializer: Arc<dyn Serializer>) -> Self {
        Self { store, serializer }
    }

    /// Load an instance, decoding its data as `D`.
    ///
    /// Returns `None` if no process exists for `correlation_id`.
    pub async fn find<D: ProcessData>(
        &self,
        correlation_id: CorrelationId,
    ) -> Result<Option<ProcessInstance<D>>> {
        let Some(persisted) = self.store.find(correlation_id).await? else {
            return Ok(None);
        };

        let data: D = from_blob(self.serializer.as_ref(), &persisted.blob)?;
        Ok(Some(ProcessInstance::rehydrate(
            persisted.correlation_id,
            persisted.headers,
            data,
        )))
    }

    /// Persist an instance, replacing any previous state and headers.
    pub async fn save<D: ProcessData>(&self, instance: &ProcessInstance<D>) -> Result<()> {
        let blob = to_blob(self.serializer.as_ref(), instance.data())?;

        debug!(
            correlation_id = %instance.correlation_id(),
            serializer = self.serializer.name(),
            bytes = blob.len(),
            "Saving process"
        );

        let persisted = PersistedProcess {
            correlation_id: instance.correlation_id(),
            blob,
            headers: instance.headers().clone(),
        };
        self.store.save(&persisted).await?;
        Ok(())
    }

    /// Remove a process and its headers.
    pub async fn complete(&self, correlation_id: CorrelationId) -> Result<()> {
        self.store.complete(correlation_id).await?;
        Ok(())
    }
}
