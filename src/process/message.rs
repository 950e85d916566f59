//! Message capability declarations.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::CorrelationId;

/// What a message does to its process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Creates a process that does not exist yet.
    Initiating,
    /// Advances an existing process.
    Consuming,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Initiating => f.write_str("initiating"),
            Capability::Consuming => f.write_str("consuming"),
        }
    }
}

/// A message addressed to a single process instance.
///
/// # Example
///
/// ```ignore
/// struct OrderPlaced { order_id: CorrelationId, total: u64 }
///
/// impl Message for OrderPlaced {
///     const CAPABILITY: Capability = Capability::Initiating;
///     fn correlation_id(&self) -> CorrelationId { self.order_id }
/// }
/// ```
pub trait Message: Send + Sync + 'static {
    /// Declared capability; drives the mediator's initiate/consume split.
    const CAPABILITY: Capability;

    /// Id of the process this message creates or advances.
    fn correlation_id(&self) -> CorrelationId;
}

/// Runtime identity of a message type, used as the registry key.
#[derive(Debug, Clone, Copy)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
}

impl MessageType {
    pub fn of<M: Message>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: std::any::type_name::<M>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
