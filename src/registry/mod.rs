//! Process registry: the provided [`ProcessResolver`].
//!
//! Built once at startup; lookups are `HashMap` reads keyed by message
//! `TypeId` and capability. Registration is type-checked: a process can only
//! be registered as initiated or consumed by a message it has a handler for.
//!
//! ```ignore
//! let registry = ProcessRegistry::builder()
//!     .process(OrderFulfilment::new())
//!     .initiated_by::<OrderPlaced>()
//!     .consumed_by::<PaymentReceived>()
//!     .register()
//!     .build();
//! ```

mod route;

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::interfaces::{MessageRoute, ProcessDescriptor, ProcessResolver, ResolutionError};
use crate::process::{Capability, ConsumedBy, InitiatedBy, Message, MessageType, Process};

use route::{ConsumptionRoute, InitiationRoute};

/// All routes registered for one (message type, capability) pair.
struct RouteEntry {
    message_type: MessageType,
    routes: Vec<Arc<dyn MessageRoute>>,
}

/// Immutable map from message types to process routes.
#[derive(Default)]
pub struct ProcessRegistry {
    routes: HashMap<(TypeId, Capability), RouteEntry>,
    descriptors: Vec<ProcessDescriptor>,
}

impl ProcessRegistry {
    pub fn builder() -> ProcessRegistryBuilder {
        ProcessRegistryBuilder::default()
    }

    /// Every registered process, in registration order.
    pub fn descriptors(&self) -> &[ProcessDescriptor] {
        &self.descriptors
    }

    /// Message types bound to more than one process for the same capability.
    ///
    /// Such messages always fail to resolve; hosts can call this at startup to
    /// reject the configuration early.
    pub fn ambiguities(&self) -> Vec<ResolutionError> {
        let mut found: Vec<ResolutionError> = self
            .routes
            .iter()
            .filter(|(_, entry)| entry.routes.len() > 1)
            .map(|((_, capability), entry)| ambiguous(entry, *capability))
            .collect();
        found.sort_by_key(|e| e.to_string());
        found
    }

    fn lookup(
        &self,
        message_type: MessageType,
        capability: Capability,
    ) -> Result<Arc<dyn MessageRoute>, ResolutionError> {
        let not_found = || ResolutionError::NotFound {
            message_type: message_type.name(),
            capability,
        };

        let entry = self
            .routes
            .get(&(message_type.id(), capability))
            .ok_or_else(not_found)?;

        match entry.routes.as_slice() {
            [] => Err(not_found()),
            [route] => Ok(Arc::clone(route)),
            _ => Err(ambiguous(entry, capability)),
        }
    }
}

fn ambiguous(entry: &RouteEntry, capability: Capability) -> ResolutionError {
    ResolutionError::Ambiguous {
        message_type: entry.message_type.name(),
        capability,
        processes: entry
            .routes
            .iter()
            .map(|route| route.process_name().to_string())
            .collect(),
    }
}

impl ProcessResolver for ProcessRegistry {
    fn resolve(&self, process_name: &str) -> Option<&ProcessDescriptor> {
        self.descriptors.iter().find(|d| d.name == process_name)
    }

    fn resolve_initiated_by(
        &self,
        message_type: MessageType,
    ) -> Result<Arc<dyn MessageRoute>, ResolutionError> {
        self.lookup(message_type, Capability::Initiating)
    }

    fn resolve_consumed_by(
        &self,
        message_type: MessageType,
    ) -> Result<Arc<dyn MessageRoute>, ResolutionError> {
        self.lookup(message_type, Capability::Consuming)
    }
}

/// Collects process registrations.
#[derive(Default)]
pub struct ProcessRegistryBuilder {
    registry: ProcessRegistry,
}

impl ProcessRegistryBuilder {
    /// Start registering the messages of `process`.
    pub fn process<P: Process>(self, process: P) -> ProcessRegistration<P> {
        self.process_shared(Arc::new(process))
    }

    /// Like [`ProcessRegistryBuilder::process`], for a process already behind an `Arc`.
    pub fn process_shared<P: Process>(self, process: Arc<P>) -> ProcessRegistration<P> {
        let descriptor = ProcessDescriptor {
            name: process.name().to_string(),
            initiated_by: Vec::new(),
            consumed_by: Vec::new(),
        };
        ProcessRegistration {
            builder: self,
            process,
            descriptor,
            routes: Vec::new(),
        }
    }

    pub fn build(self) -> ProcessRegistry {
        let registry = self.registry;
        for ambiguity in registry.ambiguities() {
            warn!(error = %ambiguity, "Ambiguous message registration");
        }
        info!(
            processes = registry.descriptors.len(),
            routes = registry.routes.len(),
            "Process registry built"
        );
        registry
    }

    fn add(
        &mut self,
        descriptor: ProcessDescriptor,
        routes: Vec<(MessageType, Arc<dyn MessageRoute>)>,
    ) {
        if self.registry.descriptors.iter().any(|d| d.name == descriptor.name) {
            warn!(process = %descriptor.name, "Process name registered more than once");
        }

        for (message_type, route) in routes {
            self.registry
                .routes
                .entry((message_type.id(), route.capability()))
                .or_insert_with(|| RouteEntry {
                    message_type,
                    routes: Vec::new(),
                })
                .routes
                .push(route);
        }

        self.registry.descriptors.push(descriptor);
    }
}

/// Registration of one process; finish with [`ProcessRegistration::register`].
pub struct ProcessRegistration<P> {
    builder: ProcessRegistryBuilder,
    process: Arc<P>,
    descriptor: ProcessDescriptor,
    routes: Vec<(MessageType, Arc<dyn MessageRoute>)>,
}

impl<P: Process> ProcessRegistration<P> {
    /// Declare that `M` creates instances of this process.
    pub fn initiated_by<M: Message>(mut self) -> Self
    where
        P: InitiatedBy<M>,
    {
        let message_type = MessageType::of::<M>();
        if self.descriptor.initiated_by.contains(&message_type) {
            return self;
        }
        if M::CAPABILITY != Capability::Initiating {
            warn!(
                process = %self.descriptor.name,
                message_type = %message_type,
                declared = %M::CAPABILITY,
                "Initiating registration for a message with another capability is never routed"
            );
        }

        let route: Arc<dyn MessageRoute> =
            Arc::new(InitiationRoute::<P, M>::new(Arc::clone(&self.process)));
        self.descriptor.initiated_by.push(message_type);
        self.routes.push((message_type, route));
        self
    }

    /// Declare that `M` advances existing instances of this process.
    pub fn consumed_by<M: Message>(mut self) -> Self
    where
        P: ConsumedBy<M>,
    {
        let message_type = MessageType::of::<M>();
        if self.descriptor.consumed_by.contains(&message_type) {
            return self;
        }
        if M::CAPABILITY != Capability::Consuming {
            warn!(
                process = %self.descriptor.name,
                message_type = %message_type,
                declared = %M::CAPABILITY,
                "Consuming registration for a message with another capability is never routed"
            );
        }

        let route: Arc<dyn MessageRoute> =
            Arc::new(ConsumptionRoute::<P, M>::new(Arc::clone(&self.process)));
        self.descriptor.consumed_by.push(message_type);
        self.routes.push((message_type, route));
        self
    }

    /// Finish this process and return to the builder.
    pub fn register(self) -> ProcessRegistryBuilder {
        let mut builder = self.builder;
        info!(
            process = %self.descriptor.name,
            initiated_by = self.descriptor.initiated_by.len(),
            consumed_by = self.descriptor.consumed_by.len(),
            "Registered process"
        );
        builder.add(self.descriptor, self.routes);
        builder
    }
}
