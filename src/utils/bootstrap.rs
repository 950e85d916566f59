//! Bootstrap utilities for hosts embedding the mediator.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LOG_ENV_VAR};
use crate::hooks::HookChain;
use crate::interfaces::{PersistenceError, ProcessResolver};
use crate::mediator::ProcessMediator;
use crate::repository::ProcessRepository;
use crate::storage::init_storage;

/// Initialize tracing with SAGA_LOG environment variable.
///
/// Defaults to "info" level if SAGA_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build a mediator from configuration: storage backend and blob format.
pub async fn build_mediator(
    config: &Config,
    resolver: Arc<dyn ProcessResolver>,
    hooks: HookChain,
) -> Result<ProcessMediator, PersistenceError> {
    let store = init_storage(&config.storage).await?;
    let serializer = config.serialization.serializer();
    let repository = ProcessRepository::with_serializer(store, Arc::from(serializer));
    Ok(ProcessMediator::with_repository(
        resolver, repository, hooks,
    ))
}
