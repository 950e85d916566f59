//! Shared saga fixtures for integration tests.
//!
//! A small shipping saga: a shipment is requested with a list of items,
//! items are packed one by one, and dispatch is only accepted once every
//! item is packed.

#![allow(dead_code)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use saga_mediator::{
    Capability, ConsumedBy, CorrelationId, InitiatedBy, Message, Process, ProcessRegistry,
    ValidationErrors,
};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub destination: String,
    pub pending: Vec<String>,
    pub packed: Vec<String>,
    pub dispatched: bool,
}

pub struct ShipmentRequested {
    pub shipment_id: CorrelationId,
    pub destination: String,
    pub items: Vec<String>,
}

impl Message for ShipmentRequested {
    const CAPABILITY: Capability = Capability::Initiating;

    fn correlation_id(&self) -> CorrelationId {
        self.shipment_id
    }
}

pub struct ItemPacked {
    pub shipment_id: CorrelationId,
    pub item: String,
}

impl Message for ItemPacked {
    const CAPABILITY: Capability = Capability::Consuming;

    fn correlation_id(&self) -> CorrelationId {
        self.shipment_id
    }
}

pub struct ShipmentDispatched {
    pub shipment_id: CorrelationId,
}

impl Message for ShipmentDispatched {
    const CAPABILITY: Capability = Capability::Consuming;

    fn correlation_id(&self) -> CorrelationId {
        self.shipment_id
    }
}

pub struct ShippingSaga;

impl Process for ShippingSaga {
    type Data = Shipment;

    fn name(&self) -> &str {
        "shipping"
    }
}

impl InitiatedBy<ShipmentRequested> for ShippingSaga {
    fn initiate(&self, data: &mut Shipment, message: &ShipmentRequested) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.ensure(
            !message.destination.trim().is_empty(),
            "destination",
            "destination is required",
        );
        errors.ensure(!message.items.is_empty(), "items", "at least one item is required");

        data.destination = message.destination.clone();
        data.pending = message.items.clone();
        errors
    }
}

impl ConsumedBy<ItemPacked> for ShippingSaga {
    fn consume(&self, data: &mut Shipment, message: &ItemPacked) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match data.pending.iter().position(|item| *item == message.item) {
            Some(index) => {
                let item = data.pending.remove(index);
                data.packed.push(item);
            }
            None => errors.add("item", format!("{} is not pending", message.item)),
        }
        errors
    }
}

impl ConsumedBy<ShipmentDispatched> for ShippingSaga {
    fn consume(&self, data: &mut Shipment, _message: &ShipmentDispatched) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if errors.ensure(data.pending.is_empty(), "pending", "items still pending") {
            data.dispatched = true;
        }
        errors
    }
}

pub fn shipping_registry() -> Arc<ProcessRegistry> {
    Arc::new(
        ProcessRegistry::builder()
            .process(ShippingSaga)
            .initiated_by::<ShipmentRequested>()
            .consumed_by::<ItemPacked>()
            .consumed_by::<ShipmentDispatched>()
            .register()
            .build(),
    )
}

pub fn requested(id: CorrelationId, items: &[&str]) -> ShipmentRequested {
    ShipmentRequested {
        shipment_id: id,
        destination: "Rotterdam".to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn packed(id: CorrelationId, item: &str) -> ItemPacked {
    ItemPacked {
        shipment_id: id,
        item: item.to_string(),
    }
}
