//! Lifecycle hook interface.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

use crate::process::{Capability, CorrelationId, Headers, Message, MessageType};
use crate::validation::ValidationErrors;

/// Error type hooks report to abort a pipeline.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// The five extension points of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeInitialisation,
    AfterInitialisation,
    BeforeConsuming,
    AfterConsuming,
    AfterSave,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookPoint::BeforeInitialisation => "before_initialisation",
            HookPoint::AfterInitialisation => "after_initialisation",
            HookPoint::BeforeConsuming => "before_consuming",
            HookPoint::AfterConsuming => "after_consuming",
            HookPoint::AfterSave => "after_save",
        };
        f.write_str(name)
    }
}

/// Hook-facing view of one pipeline run.
///
/// Hooks can read the message, the process data and the accumulated
/// validation errors, and can modify headers and errors. They cannot replace
/// the process data or its correlation id.
pub trait PipelineContext: Send {
    fn correlation_id(&self) -> CorrelationId;

    fn message_type(&self) -> MessageType;

    fn capability(&self) -> Capability;

    /// Name of the process handling the message.
    fn process_name(&self) -> &str;

    fn message(&self) -> &dyn Any;

    /// Current business data of the instance.
    fn data(&self) -> &dyn Any;

    fn headers(&self) -> &Headers;

    fn headers_mut(&mut self) -> &mut Headers;

    fn validation_errors(&self) -> &ValidationErrors;

    fn validation_errors_mut(&mut self) -> &mut ValidationErrors;
}

impl<'a> dyn PipelineContext + 'a {
    /// Typed access to the message, if it is an `M`.
    pub fn message_as<M: Message>(&self) -> Option<&M> {
        self.message().downcast_ref::<M>()
    }

    /// Typed access to the process data, if it is a `D`.
    pub fn data_as<D: 'static>(&self) -> Option<&D> {
        self.data().downcast_ref::<D>()
    }

    /// True while no validation error has been recorded.
    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }
}

/// Observer invoked at the pipeline's extension points.
///
/// Every method defaults to a no-op, so a hook implements only the points it
/// cares about. Returning an error aborts the pipeline: remaining hooks are
/// skipped and nothing is persisted.
#[async_trait]
pub trait ProcessHook: Send + Sync {
    /// Hook name used in logs and error reports.
    fn name(&self) -> &str;

    async fn before_initialisation(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        Ok(())
    }

    async fn after_initialisation(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        Ok(())
    }

    async fn before_consuming(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        Ok(())
    }

    async fn after_consuming(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs only after the store committed the instance.
    async fn after_save(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        Ok(())
    }
}
