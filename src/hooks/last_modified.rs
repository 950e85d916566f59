//! Last-modified timestamp hook.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use crate::interfaces::{HookError, PipelineContext, ProcessHook};

/// Header written by [`LastModifiedHook`].
pub const LAST_MODIFIED_HEADER: &str = "last_modified";

/// Stamps the current UTC time into the instance headers once the business
/// handler has run, so every saved instance carries its modification time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastModifiedHook;

impl LastModifiedHook {
    pub fn new() -> Self {
        Self
    }

    fn stamp(ctx: &mut dyn PipelineContext) {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        ctx.headers_mut()
            .insert(LAST_MODIFIED_HEADER.to_string(), now);
    }
}

#[async_trait]
impl ProcessHook for LastModifiedHook {
    fn name(&self) -> &str {
        "last_modified"
    }

    async fn after_initialisation(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        Self::stamp(ctx);
        Ok(())
    }

    async fn after_consuming(&self, ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        Self::stamp(ctx);
        Ok(())
    }
}
