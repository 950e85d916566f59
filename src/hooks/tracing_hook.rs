//! Hook that logs every extension point.

use async_trait::async_trait;
use tracing::debug;

use crate::interfaces::{HookError, HookPoint, PipelineContext, ProcessHook};

/// Emits a debug event at each extension point.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl TracingHook {
    pub fn new() -> Self {
        Self
    }
}

fn log_point(point: HookPoint, ctx: &dyn PipelineContext) {
    debug!(
        point = %point,
        process = ctx.process_name(),
        message_type = %ctx.message_type(),
        correlation_id = %ctx.correlation_id(),
        validation_errors = ctx.validation_errors().len(),
        headers = ctx.headers().len(),
        "Pipeline hook"
    );
}

#[async_trait]
impl ProcessHook for TracingHook {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn before_initialisation(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        log_point(HookPoint::BeforeInitialisation, ctx);
        Ok(())
    }

    async fn after_initialisation(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        log_point(HookPoint::AfterInitialisation, ctx);
        Ok(())
    }

    async fn before_consuming(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        log_point(HookPoint::BeforeConsuming, ctx);
        Ok(())
    }

    async fn after_consuming(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        log_point(HookPoint::AfterConsuming, ctx);
        Ok(())
    }

    async fn after_save(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        log_point(HookPoint::AfterSave, ctx);
        Ok(())
    }
}
