//! Process model: correlation ids, process instances and the business
//! handler contract.
//!
//! A process (saga) is a long-running unit of business state. Each instance
//! is keyed by a [`CorrelationId`], carries free-form [`Headers`] and owns a
//! business-data payload that only the orchestration core may hand out for
//! mutation.

mod message;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidationErrors;

pub use message::{Capability, Message, MessageType};

/// Header map persisted alongside a process instance.
///
/// Insertion order is irrelevant; the whole map is replaced on every save.
pub type Headers = HashMap<String, String>;

/// Identifier binding a process instance to its durable record and to every
/// message addressed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a fresh random correlation id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for CorrelationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Bounds every business-data payload must satisfy.
///
/// `Default` supplies the initial state of a freshly initiated process;
/// serde supplies the durable representation.
pub trait ProcessData: Serialize + DeserializeOwned + Default + Send + Sync + 'static {}

impl<T> ProcessData for T where T: Serialize + DeserializeOwned + Default + Send + Sync + 'static {}

/// A live process: correlation id, headers and encapsulated business data.
///
/// Callers can read the data but never obtain mutable access to it. The
/// mediator lends it to the business handler, and the repository pairs a
/// freshly deserialized payload with its instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInstance<D> {
    correlation_id: CorrelationId,
    headers: Headers,
    data: D,
}

impl<D> ProcessInstance<D> {
    /// Create an instance with empty headers.
    pub fn new(correlation_id: CorrelationId, data: D) -> Self {
        Self {
            correlation_id,
            headers: Headers::new(),
            data,
        }
    }

    /// Reassemble an instance from its persisted parts.
    pub(crate) fn rehydrate(correlation_id: CorrelationId, headers: Headers, data: D) -> Self {
        Self {
            correlation_id,
            headers,
            data,
        }
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Builder-style header insertion.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }
}

/// A process type: owns the business rules for one kind of saga.
///
/// The process object itself is stateless with respect to instances; per
/// instance state lives in [`Process::Data`] and is handed to the handlers.
pub trait Process: Send + Sync + 'static {
    /// Business-data payload of each instance.
    type Data: ProcessData;

    /// Stable process name used for resolution, logging and diagnostics.
    fn name(&self) -> &str;
}

/// Declares that `M` creates new instances of this process.
///
/// Handlers append business-rule violations to the returned list instead of
/// failing; a non-empty list prevents the instance from being persisted.
pub trait InitiatedBy<M: Message>: Process {
    fn initiate(&self, data: &mut Self::Data, message: &M) -> ValidationErrors;
}

/// Declares that `M` advances existing instances of this process.
pub trait ConsumedBy<M: Message>: Process {
    fn consume(&self, data: &mut Self::Data, message: &M) -> ValidationErrors;
}
