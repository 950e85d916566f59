//! Test doubles for stores and hooks.
//!
//! Recording doubles append to a shared [`CallLog`] so tests can assert the
//! interleaving of hook calls and store calls.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::interfaces::process_store::Result as StoreResult;
use crate::interfaces::{
    HookError, HookPoint, PersistedProcess, PersistenceError, PipelineContext, ProcessHook,
    ProcessStore,
};
use crate::process::CorrelationId;
use crate::storage::InMemoryProcessStore;

/// Shared, ordered record of calls.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, entry: impl Into<String>) {
        self.0.lock().await.push(entry.into());
    }

    pub async fn entries(&self) -> Vec<String> {
        self.0.lock().await.clone()
    }

    pub async fn count(&self, entry: &str) -> usize {
        self.0.lock().await.iter().filter(|e| *e == entry).count()
    }
}

/// In-memory store that logs every call and can be told to fail saves.
#[derive(Default)]
pub struct RecordingProcessStore {
    inner: InMemoryProcessStore,
    log: CallLog,
    fail_on_save: RwLock<bool>,
}

impl RecordingProcessStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub async fn set_fail_on_save(&self, fail: bool) {
        *self.fail_on_save.write().await = fail;
    }

    pub async fn stored_count(&self) -> usize {
        self.inner.stored_count().await
    }
}

#[async_trait]
impl ProcessStore for RecordingProcessStore {
    async fn find(&self, correlation_id: CorrelationId) -> StoreResult<Option<PersistedProcess>> {
        self.log.push("store.find").await;
        self.inner.find(correlation_id).await
    }

    async fn save(&self, process: &PersistedProcess) -> StoreResult<()> {
        self.log.push("store.save").await;
        if *self.fail_on_save.read().await {
            return Err(PersistenceError::Unavailable("save disabled".to_string()));
        }
        self.inner.save(process).await
    }

    async fn complete(&self, correlation_id: CorrelationId) -> StoreResult<()> {
        self.log.push("store.complete").await;
        self.inner.complete(correlation_id).await
    }
}

/// Hook that logs `<name>.<point>` at every extension point.
pub struct RecordingHook {
    name: String,
    log: CallLog,
}

impl RecordingHook {
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            log,
        }
    }

    async fn record(&self, point: HookPoint) -> Result<(), HookError> {
        self.log.push(format!("{}.{}", self.name, point)).await;
        Ok(())
    }
}

#[async_trait]
impl ProcessHook for RecordingHook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn before_initialisation(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.record(HookPoint::BeforeInitialisation).await
    }

    async fn after_initialisation(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.record(HookPoint::AfterInitialisation).await
    }

    async fn before_consuming(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.record(HookPoint::BeforeConsuming).await
    }

    async fn after_consuming(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.record(HookPoint::AfterConsuming).await
    }

    async fn after_save(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.record(HookPoint::AfterSave).await
    }
}

/// Hook that fails at one extension point.
pub struct FailingHook {
    point: HookPoint,
}

impl FailingHook {
    pub fn at(point: HookPoint) -> Self {
        Self { point }
    }

    fn check(&self, point: HookPoint) -> Result<(), HookError> {
        if point == self.point {
            Err(format!("refused at {}", point).into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProcessHook for FailingHook {
    fn name(&self) -> &str {
        "failing"
    }

    async fn before_initialisation(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.check(HookPoint::BeforeInitialisation)
    }

    async fn after_initialisation(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.check(HookPoint::AfterInitialisation)
    }

    async fn before_consuming(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.check(HookPoint::BeforeConsuming)
    }

    async fn after_consuming(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.check(HookPoint::AfterConsuming)
    }

    async fn after_save(&self, _ctx: &mut dyn PipelineContext) -> Result<(), HookError> {
        self.check(HookPoint::AfterSave)
    }
}

/// Order fulfilment saga used across unit tests.
pub mod orders {
    use serde::{Deserialize, Serialize};

    use crate::process::{Capability, ConsumedBy, CorrelationId, InitiatedBy, Message, Process};
    use crate::validation::ValidationErrors;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Order {
        pub amount: u64,
        pub paid: u64,
        pub status: String,
    }

    pub struct OrderPlaced {
        pub order_id: CorrelationId,
        pub amount: u64,
    }

    impl Message for OrderPlaced {
        const CAPABILITY: Capability = Capability::Initiating;

        fn correlation_id(&self) -> CorrelationId {
            self.order_id
        }
    }

    pub struct PaymentReceived {
        pub order_id: CorrelationId,
        pub amount: u64,
    }

    impl Message for PaymentReceived {
        const CAPABILITY: Capability = Capability::Consuming;

        fn correlation_id(&self) -> CorrelationId {
            self.order_id
        }
    }

    /// Places orders and records payments; rejects empty orders and
    /// overpayment.
    pub struct OrderProcess;

    impl Process for OrderProcess {
        type Data = Order;

        fn name(&self) -> &str {
            "order"
        }
    }

    impl InitiatedBy<OrderPlaced> for OrderProcess {
        fn initiate(&self, data: &mut Order, message: &OrderPlaced) -> ValidationErrors {
            let mut errors = ValidationErrors::new();
            if !errors.ensure(message.amount > 0, "amount", "order amount must be positive") {
                return errors;
            }
            data.amount = message.amount;
            data.status = "placed".to_string();
            errors
        }
    }

    impl ConsumedBy<PaymentReceived> for OrderProcess {
        fn consume(&self, data: &mut Order, message: &PaymentReceived) -> ValidationErrors {
            let mut errors = ValidationErrors::new();
            data.paid += message.amount;
            errors.ensure(data.paid <= data.amount, "amount", "payment exceeds order total");
            if data.paid == data.amount {
                data.status = "paid".to_string();
            }
            errors
        }
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Ledger {
        pub entries: u32,
    }

    /// Second process consuming payments, for ambiguity scenarios.
    pub struct LedgerProcess;

    impl Process for LedgerProcess {
        type Data = Ledger;

        fn name(&self) -> &str {
            "ledger"
        }
    }

    impl ConsumedBy<PaymentReceived> for LedgerProcess {
        fn consume(&self, data: &mut Ledger, _message: &PaymentReceived) -> ValidationErrors {
            data.entries += 1;
            ValidationErrors::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_store_logs_calls() {
        let log = CallLog::new();
        let store = RecordingProcessStore::new(log.clone());
        let id = CorrelationId::new();

        store.find(id).await.unwrap();
        store.complete(id).await.unwrap();

        assert_eq!(log.entries().await, vec!["store.find", "store.complete"]);
    }

    #[tokio::test]
    async fn test_recording_store_fail_on_save() {
        let store = RecordingProcessStore::new(CallLog::new());
        store.set_fail_on_save(true).await;

        let result = store
            .save(&PersistedProcess {
                correlation_id: CorrelationId::new(),
                blob: Vec::new(),
                headers: Default::default(),
            })
            .await;

        assert!(matches!(result, Err(PersistenceError::Unavailable(_))));
        assert_eq!(store.stored_count().await, 0);
    }
}
