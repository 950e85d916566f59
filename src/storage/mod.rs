//! Storage implementations.
//!
//! - `memory`: non-durable `InMemoryProcessStore`
//! - `sql`: transactional `SqlProcessStore` for SQLite and PostgreSQL

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{StorageConfig, StorageType};
use crate::interfaces::{PersistenceError, ProcessStore};

pub mod memory;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod schema;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

pub use memory::InMemoryProcessStore;

#[cfg(feature = "postgres")]
pub use sql::postgres::PostgresProcessStore;
#[cfg(feature = "sqlite")]
pub use sql::sqlite::SqliteProcessStore;

/// Initialize storage based on configuration.
///
/// SQL stores are connected and their schema created before returning.
pub async fn init_storage(
    config: &StorageConfig,
) -> Result<Arc<dyn ProcessStore>, PersistenceError> {
    match config.storage_type {
        StorageType::Memory => {
            info!(storage_type = "memory", "Storage initialized");
            Ok(Arc::new(InMemoryProcessStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

            let path = &config.sqlite.path;
            let in_memory = path == ":memory:";
            let options = if in_memory {
                SqliteConnectOptions::new().in_memory(true)
            } else {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
                    }
                }
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
            };

            // Each in-memory connection is a separate database.
            let max_connections = if in_memory {
                1
            } else {
                config.sqlite.max_connections
            };

            let pool = SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await?;

            let store = SqliteProcessStore::new(pool);
            store.init().await?;

            info!(storage_type = "sqlite", path = %path, "Storage initialized");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => {
            error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err(PersistenceError::Unavailable(
                "sqlite feature not enabled".to_string(),
            ))
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            use sqlx::postgres::PgPoolOptions;

            let pool = PgPoolOptions::new()
                .max_connections(config.postgres.max_connections)
                .connect(&config.postgres.uri)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to connect to PostgreSQL"))?;

            let store = PostgresProcessStore::new(pool);
            store.init().await?;

            info!(storage_type = "postgres", "Storage initialized");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        StorageType::Postgres => {
            error!("PostgreSQL storage requested but 'postgres' feature is not enabled");
            Err(PersistenceError::Unavailable(
                "postgres feature not enabled".to_string(),
            ))
        }
    }
}
