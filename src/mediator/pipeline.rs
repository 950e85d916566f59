//! The typed before/handle/after/save pipeline.

use tracing::{debug, info};

use super::context::Invocation;
use super::{MediatorError, OperationResult};
use crate::hooks::HookChain;
use crate::interfaces::HookPoint;
use crate::process::{ConsumedBy, InitiatedBy, Message, ProcessData, ProcessInstance};
use crate::repository::ProcessRepository;

/// Runs one message against one process instance.
///
/// Routes call into the pipeline with their concrete process and message
/// types; the pipeline owns everything that does not depend on them.
pub struct Pipeline {
    repository: ProcessRepository,
    hooks: HookChain,
}

impl Pipeline {
    pub(crate) fn new(repository: ProcessRepository, hooks: HookChain) -> Self {
        Self { repository, hooks }
    }

    pub(crate) fn repository(&self) -> &ProcessRepository {
        &self.repository
    }

    /// Create a new instance of `P` from an initiating message.
    pub async fn initiate<P, M>(
        &self,
        process: &P,
        message: &M,
    ) -> Result<OperationResult, MediatorError>
    where
        P: InitiatedBy<M>,
        M: Message,
    {
        let instance = ProcessInstance::new(message.correlation_id(), P::Data::default());
        let mut invocation = Invocation::new(message, process.name(), instance);

        self.hooks
            .run(HookPoint::BeforeInitialisation, &mut invocation)
            .await?;

        let errors = process.initiate(invocation.instance.data_mut(), message);
        invocation.errors.extend(errors);

        self.hooks
            .run(HookPoint::AfterInitialisation, &mut invocation)
            .await?;

        self.finish(invocation).await
    }

    /// Load the instance addressed by a consuming message and advance it.
    pub async fn advance<P, M>(
        &self,
        process: &P,
        message: &M,
    ) -> Result<OperationResult, MediatorError>
    where
        P: ConsumedBy<M>,
        M: Message,
    {
        let correlation_id = message.correlation_id();
        let instance = self
            .repository
            .find::<P::Data>(correlation_id)
            .await?
            .ok_or(MediatorError::NotFound { correlation_id })?;
        let mut invocation = Invocation::new(message, process.name(), instance);

        self.hooks
            .run(HookPoint::BeforeConsuming, &mut invocation)
            .await?;

        let errors = process.consume(invocation.instance.data_mut(), message);
        invocation.errors.extend(errors);

        self.hooks
            .run(HookPoint::AfterConsuming, &mut invocation)
            .await?;

        self.finish(invocation).await
    }

    /// Persist a valid instance and run the after-save hooks.
    async fn finish<M, D>(
        &self,
        mut invocation: Invocation<'_, M, D>,
    ) -> Result<OperationResult, MediatorError>
    where
        M: Message,
        D: ProcessData,
    {
        let correlation_id = invocation.instance.correlation_id();

        if !invocation.errors.is_empty() {
            info!(
                %correlation_id,
                errors = invocation.errors.len(),
                "Validation failed, process not saved"
            );
            return Ok(OperationResult::failed(invocation.errors));
        }

        self.repository.save(&invocation.instance).await?;
        debug!(%correlation_id, "Process saved");

        self.hooks
            .run(HookPoint::AfterSave, &mut invocation)
            .await?;

        Ok(OperationResult::success())
    }
}
