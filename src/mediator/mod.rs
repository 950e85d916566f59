//! Process mediator: the single entry point for incoming messages.
//!
//! `consume` classifies a message by its declared capability, resolves the
//! one process that handles it and runs the hook pipeline around the
//! process's business handler. Valid instances are saved; instances with
//! validation errors are discarded and the errors returned to the caller.

pub(crate) mod context;
mod pipeline;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::hooks::HookChain;
use crate::interfaces::{
    HookError, HookPoint, PersistenceError, ProcessResolver, ProcessStore, ResolutionError,
    SerializationError,
};
use crate::process::{
    Capability, CorrelationId, Message, MessageType, ProcessData, ProcessInstance,
};
use crate::repository::{ProcessRepository, RepositoryError};
use crate::validation::{ValidationError, ValidationErrors};

pub use pipeline::Pipeline;

/// Infrastructure failures of a mediator call.
///
/// Business-rule violations are never reported here; they are returned in
/// [`OperationResult`].
#[derive(Debug, thiserror::Error)]
pub enum MediatorError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("No process found for correlation id {correlation_id}")]
    NotFound { correlation_id: CorrelationId },

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Hook '{hook}' failed at {point}: {source}")]
    Hook {
        hook: String,
        point: HookPoint,
        #[source]
        source: HookError,
    },

    #[error("Route expected message type {expected}")]
    MessageMismatch { expected: &'static str },
}

impl From<RepositoryError> for MediatorError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Serialization(e) => MediatorError::Serialization(e),
            RepositoryError::Persistence(e) => MediatorError::Persistence(e),
        }
    }
}

/// Outcome of a pipeline run that reached the business handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationResult {
    errors: ValidationErrors,
}

impl OperationResult {
    /// The instance was saved.
    pub fn success() -> Self {
        Self::default()
    }

    /// The instance was rejected and not saved.
    pub fn failed(errors: ValidationErrors) -> Self {
        Self { errors }
    }

    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        self.errors.as_slice()
    }

    pub fn into_validation_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// Orchestrates process instances in response to messages.
///
/// Holds only shared immutable state, so one mediator can serve concurrent
/// calls. Calls for different correlation ids are independent; calls for the
/// same id are serialized only as far as the store's transactions go.
pub struct ProcessMediator {
    resolver: Arc<dyn ProcessResolver>,
    pipeline: Pipeline,
}

impl ProcessMediator {
    /// Create a mediator storing JSON blobs in `store`.
    pub fn new(
        resolver: Arc<dyn ProcessResolver>,
        store: Arc<dyn ProcessStore>,
        hooks: HookChain,
    ) -> Self {
        Self::with_repository(resolver, ProcessRepository::new(store), hooks)
    }

    /// Create a mediator over a preconfigured repository.
    pub fn with_repository(
        resolver: Arc<dyn ProcessResolver>,
        repository: ProcessRepository,
        hooks: HookChain,
    ) -> Self {
        Self {
            resolver,
            pipeline: Pipeline::new(repository, hooks),
        }
    }

    /// Handle one message.
    ///
    /// Initiating messages create a new instance; consuming messages load and
    /// advance an existing one. Returns `Ok` with validation errors when the
    /// business handler rejected the message, and `Err` for infrastructure
    /// failures.
    #[tracing::instrument(
        name = "mediator.consume",
        skip_all,
        fields(
            message_type = std::any::type_name::<M>(),
            capability = %M::CAPABILITY,
            correlation_id = %message.correlation_id(),
        )
    )]
    pub async fn consume<M: Message>(&self, message: &M) -> Result<OperationResult, MediatorError> {
        let message_type = MessageType::of::<M>();
        let route = match M::CAPABILITY {
            Capability::Initiating => self.resolver.resolve_initiated_by(message_type),
            Capability::Consuming => self.resolver.resolve_consumed_by(message_type),
        }
        .inspect_err(|e| warn!(error = %e, "Message could not be resolved"))?;

        debug!(process = route.process_name(), "Resolved process");

        let result = route.dispatch(&self.pipeline, message).await?;

        if result.is_successful() {
            debug!(process = route.process_name(), "Message handled");
        }
        Ok(result)
    }

    /// Remove a finished process and its headers.
    #[tracing::instrument(name = "mediator.complete", skip(self))]
    pub async fn complete(&self, correlation_id: CorrelationId) -> Result<(), MediatorError> {
        self.pipeline.repository().complete(correlation_id).await?;
        debug!("Process completed");
        Ok(())
    }

    /// Load a process instance, decoding its data as `D`.
    pub async fn find<D: ProcessData>(
        &self,
        correlation_id: CorrelationId,
    ) -> Result<Option<ProcessInstance<D>>, MediatorError> {
        Ok(self.pipeline.repository().find(correlation_id).await?)
    }
}
