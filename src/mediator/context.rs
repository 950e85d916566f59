//! Per-call pipeline state.

use std::any::Any;

use crate::interfaces::PipelineContext;
use crate::process::{Capability, CorrelationId, Headers, Message, MessageType, ProcessInstance};
use crate::validation::ValidationErrors;

/// One message travelling through the pipeline for one process instance.
pub(crate) struct Invocation<'a, M, D> {
    message: &'a M,
    process_name: &'a str,
    pub(crate) instance: ProcessInstance<D>,
    pub(crate) errors: ValidationErrors,
}

impl<'a, M, D> Invocation<'a, M, D> {
    pub(crate) fn new(message: &'a M, process_name: &'a str, instance: ProcessInstance<D>) -> Self {
        Self {
            message,
            process_name,
            instance,
            errors: ValidationErrors::new(),
        }
    }
}

impl<M, D> PipelineContext for Invocation<'_, M, D>
where
    M: Message,
    D: Send + 'static,
{
    fn correlation_id(&self) -> CorrelationId {
        self.instance.correlation_id()
    }

    fn message_type(&self) -> MessageType {
        MessageType::of::<M>()
    }

    fn capability(&self) -> Capability {
        M::CAPABILITY
    }

    fn process_name(&self) -> &str {
        self.process_name
    }

    fn message(&self) -> &dyn Any {
        self.message
    }

    fn data(&self) -> &dyn Any {
        self.instance.data()
    }

    fn headers(&self) -> &Headers {
        self.instance.headers()
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self.instance.headers_mut()
    }

    fn validation_errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn validation_errors_mut(&mut self) -> &mut ValidationErrors {
        &mut self.errors
    }
}
