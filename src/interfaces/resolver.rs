//! Process resolution interface.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::mediator::{MediatorError, OperationResult, Pipeline};
use crate::process::{Capability, MessageType};

/// Errors raised when a message cannot be routed to exactly one process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("No process is {capability} by {message_type}")]
    NotFound {
        message_type: &'static str,
        capability: Capability,
    },

    #[error("{message_type} is {capability} by several processes: {}", processes.join(", "))]
    Ambiguous {
        message_type: &'static str,
        capability: Capability,
        processes: Vec<String>,
    },
}

/// Static description of a registered process type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDescriptor {
    pub name: String,
    /// Message types that create instances.
    pub initiated_by: Vec<MessageType>,
    /// Message types that advance existing instances.
    pub consumed_by: Vec<MessageType>,
}

/// Type-erased binding of one message type to one process.
///
/// A route knows the concrete process and message types it was registered
/// with and drives the typed pipeline for them.
#[async_trait]
pub trait MessageRoute: Send + Sync {
    fn process_name(&self) -> &str;

    fn capability(&self) -> Capability;

    /// Run the pipeline for `message`.
    ///
    /// Fails with `MediatorError::MessageMismatch` if `message` is not the
    /// type this route was registered for.
    async fn dispatch(
        &self,
        pipeline: &Pipeline,
        message: &(dyn Any + Send + Sync),
    ) -> Result<OperationResult, MediatorError>;
}

/// Maps message types to the process that handles them.
///
/// Resolution never guesses: a message bound to several processes for the
/// same capability is an error.
pub trait ProcessResolver: Send + Sync {
    /// Look up a process type by name.
    fn resolve(&self, process_name: &str) -> Option<&ProcessDescriptor>;

    /// Find the single process that `message_type` initiates.
    fn resolve_initiated_by(
        &self,
        message_type: MessageType,
    ) -> Result<Arc<dyn MessageRoute>, ResolutionError>;

    /// Find the single process that consumes `message_type`.
    fn resolve_consumed_by(
        &self,
        message_type: MessageType,
    ) -> Result<Arc<dyn MessageRoute>, ResolutionError>;
}
