//! Type-erased routes from a message type to a process.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::interfaces::MessageRoute;
use crate::mediator::{MediatorError, OperationResult, Pipeline};
use crate::process::{Capability, ConsumedBy, InitiatedBy, Message};

fn downcast<M: Message>(message: &(dyn Any + Send + Sync)) -> Result<&M, MediatorError> {
    message
        .downcast_ref::<M>()
        .ok_or(MediatorError::MessageMismatch {
            expected: std::any::type_name::<M>(),
        })
}

/// `M` creates instances of `P`.
pub(crate) struct InitiationRoute<P, M> {
    process: Arc<P>,
    _message: PhantomData<fn() -> M>,
}

impl<P, M> InitiationRoute<P, M> {
    pub(crate) fn new(process: Arc<P>) -> Self {
        Self {
            process,
            _message: PhantomData,
        }
    }
}

#[async_trait]
impl<P, M> MessageRoute for InitiationRoute<P, M>
where
    P: InitiatedBy<M>,
    M: Message,
{
    fn process_name(&self) -> &str {
        self.process.name()
    }

    fn capability(&self) -> Capability {
        Capability::Initiating
    }

    async fn dispatch(
        &self,
        pipeline: &Pipeline,
        message: &(dyn Any + Send + Sync),
    ) -> Result<OperationResult, MediatorError> {
        let message = downcast::<M>(message)?;
        pipeline.initiate(self.process.as_ref(), message).await
    }
}

/// `M` advances existing instances of `P`.
pub(crate) struct ConsumptionRoute<P, M> {
    process: Arc<P>,
    _message: PhantomData<fn() -> M>,
}

impl<P, M> ConsumptionRoute<P, M> {
    pub(crate) fn new(process: Arc<P>) -> Self {
        Self {
            process,
            _message: PhantomData,
        }
    }
}

#[async_trait]
impl<P, M> MessageRoute for ConsumptionRoute<P, M>
where
    P: ConsumedBy<M>,
    M: Message,
{
    fn process_name(&self) -> &str {
        self.process.name()
    }

    fn capability(&self) -> Capability {
        Capability::Consuming
    }

    async fn dispatch(
        &self,
        pipeline: &Pipeline,
        message: &(dyn Any + Send + Sync),
    ) -> Result<OperationResult, MediatorError> {
        let message = downcast::<M>(message)?;
        pipeline.advance(self.process.as_ref(), message).await
    }
}
