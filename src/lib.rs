//! Saga Mediator - process orchestration core
//!
//! Routes messages to long-running business processes ("sagas") keyed by a
//! correlation id, runs an ordered hook pipeline around each process's
//! business handler and persists valid process state transactionally.

pub mod config;
pub mod hooks;
pub mod interfaces;
pub mod mediator;
pub mod process;
pub mod registry;
pub mod repository;
pub mod serialization;
pub mod storage;
pub mod utils;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use hooks::{HookChain, LastModifiedHook, TracingHook};
pub use interfaces::{
    HookError, HookPoint, PipelineContext, ProcessHook, ProcessResolver, ProcessStore,
};
pub use mediator::{MediatorError, OperationResult, ProcessMediator};
pub use process::{
    Capability, ConsumedBy, CorrelationId, Headers, InitiatedBy, Message, MessageType, Process,
    ProcessInstance,
};
pub use registry::ProcessRegistry;
pub use repository::ProcessRepository;
pub use validation::{ValidationError, ValidationErrors};
