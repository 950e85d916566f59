//! Abstract interfaces for saga-mediator components.
//!
//! These traits define the contracts for:
//! - Process storage (persistence)
//! - Blob serialization (business data encoding)
//! - Lifecycle hooks (pipeline observers)
//! - Process resolution (message type to process routing)

pub mod hook;
pub mod process_store;
pub mod resolver;
pub mod serializer;

pub use hook::{HookError, HookPoint, PipelineContext, ProcessHook};
pub use process_store::{PersistedProcess, PersistenceError, ProcessStore};
pub use resolver::{MessageRoute, ProcessDescriptor, ProcessResolver, ResolutionError};
pub use serializer::{SerializationError, Serializer};
