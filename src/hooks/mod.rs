//! Lifecycle hook chain and built-in hooks.
//!
//! A [`HookChain`] fans each extension point out to its hooks in
//! registration order and stops at the first failure.

mod last_modified;
mod tracing_hook;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::interfaces::{HookError, HookPoint, PipelineContext, ProcessHook};
use crate::mediator::MediatorError;

pub use last_modified::{LastModifiedHook, LAST_MODIFIED_HEADER};
pub use tracing_hook::TracingHook;

/// Invoke the method of `hook` that corresponds to `point`.
async fn invoke(
    hook: &dyn ProcessHook,
    point: HookPoint,
    ctx: &mut dyn PipelineContext,
) -> Result<(), HookError> {
    match point {
        HookPoint::BeforeInitialisation => hook.before_initialisation(ctx).await,
        HookPoint::AfterInitialisation => hook.after_initialisation(ctx).await,
        HookPoint::BeforeConsuming => hook.before_consuming(ctx).await,
        HookPoint::AfterConsuming => hook.after_consuming(ctx).await,
        HookPoint::AfterSave => hook.after_save(ctx).await,
    }
}

/// Ordered composite of hooks.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn ProcessHook>>,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; it runs after every hook already registered.
    pub fn with<H: ProcessHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Append a shared hook.
    pub fn push(&mut self, hook: Arc<dyn ProcessHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook at `point`, in order, stopping at the first error.
    pub async fn run(
        &self,
        point: HookPoint,
        ctx: &mut dyn PipelineContext,
    ) -> Result<(), MediatorError> {
        for hook in &self.hooks {
            if let Err(source) = invoke(hook.as_ref(), point, ctx).await {
                warn!(
                    hook = hook.name(),
                    point = %point,
                    correlation_id = %ctx.correlation_id(),
                    error = %source,
                    "Hook failed, aborting pipeline"
                );
                return Err(MediatorError::Hook {
                    hook: hook.name().to_string(),
                    point,
                    source,
                });
            }
        }
        Ok(())
    }

    /// Same as [`HookChain::run`], but keeps the hook's own error.
    async fn run_raw(
        &self,
        point: HookPoint,
        ctx: &mut dyn PipelineContext,
    ) -> Result<(), HookError> {
        for hook in &self.hooks {
            invoke(hook.as_ref(), point, ctx).await?;
        }
        Ok(())
    }
}

impl FromIterator<Arc<dyn ProcessHook>> for HookChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn ProcessHook>>>(iter: I) -> Self {
        Self {
            hooks: iter.into_iter().collect(),
        }
    }
}

/// A chain is itself a hook, so chains can be nested.
#[async_trait]
impl ProcessHook for HookChain {
    fn name(&self) -> &str {
        "hook_chain"
    }

    async fn before_initialisation(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.run_raw(HookPoint::BeforeInitialisation, ctx).await
    }

    async fn after_initialisation(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.run_raw(HookPoint::AfterInitialisation, ctx).await
    }

    async fn before_consuming(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.run_raw(HookPoint::BeforeConsuming, ctx).await
    }

    async fn after_consuming(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.run_raw(HookPoint::AfterConsuming, ctx).await
    }

    async fn after_save(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.run_raw(HookPoint::AfterSave, ctx).await
    }
}
