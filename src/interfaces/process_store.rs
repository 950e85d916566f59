//! Process storage interface.

use async_trait::async_trait;

use crate::process::{CorrelationId, Headers};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid correlation id in storage: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable form of a process instance: id, encoded business data and the
/// header rows stored beside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProcess {
    pub correlation_id: CorrelationId,
    pub blob: Vec<u8>,
    pub headers: Headers,
}

/// Interface for process persistence.
///
/// Implementations:
/// - `InMemoryProcessStore`: non-durable map, for tests and embedding
/// - `SqliteProcessStore` / `PostgresProcessStore`: transactional SQL storage
///
/// A store holds at most one record per correlation id. Every operation is
/// atomic: a failure leaves the previously committed state untouched.
#[async_trait]
pub trait ProcessStore: Send + Sync {
    /// Load the record and its headers.
    ///
    /// Returns `None` if no record exists for `correlation_id`.
    async fn find(&self, correlation_id: CorrelationId) -> Result<Option<PersistedProcess>>;

    /// Upsert the record and replace its header rows wholesale.
    async fn save(&self, process: &PersistedProcess) -> Result<()>;

    /// Remove the record and its header rows.
    ///
    /// Completing an id that has no record is a no-op.
    async fn complete(&self, correlation_id: CorrelationId) -> Result<()>;
}
