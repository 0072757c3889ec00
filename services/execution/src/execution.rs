//! Execution service with two notification stages
//!
//! 1. `on_message`: store the order and notify record-keeping listeners
//! 2. `execute_order`: send to the venue, store, and notify the separate
//!    execution-listener list (trade booking)

use std::sync::Arc;

use tracing::info;

use soa::{notify, Connector, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::execution::{AlgoExecution, ExecutionOrder, Venue};
use types::ids::ProductId;
use types::product::Product;

/// Publish-only connector standing in for venue connectivity.
#[derive(Debug, Default)]
pub struct ExecutionConnector {
    sent: u64,
}

impl ExecutionConnector {
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Connector<ExecutionOrder> for ExecutionConnector {
    fn name(&self) -> &'static str {
        "ExecutionConnector"
    }

    fn publish(&mut self, data: &ExecutionOrder) -> Result<(), ServiceError> {
        self.sent += 1;
        info!(
            product = %data.product.product_id(),
            order_id = %data.order_id,
            side = %data.side,
            order_type = %data.order_type,
            quantity = data.total_quantity(),
            "Order sent to venue"
        );
        Ok(())
    }
}

pub struct ExecutionService {
    store: Store<ExecutionOrder>,
    execution_listeners: Vec<Arc<dyn ServiceListener<ExecutionOrder>>>,
    connector: ExecutionConnector,
}

impl ExecutionService {
    pub fn new() -> Self {
        info!("ExecutionService initialized");
        Self {
            store: Store::new("execution"),
            execution_listeners: Vec::new(),
            connector: ExecutionConnector::default(),
        }
    }

    /// Stage 2: route the order to `venue`, store it and notify
    /// execution listeners only.
    pub fn execute_order(
        &mut self,
        order: ExecutionOrder,
        venue: Venue,
    ) -> Result<(), ServiceError> {
        info!(order_id = %order.order_id, %venue, "Executing order");
        self.connector.publish(&order)?;

        let stored = self.store.insert(order);
        notify(&self.execution_listeners, stored)
    }

    /// Register a stage-2 listener.
    pub fn add_execution_listener(&mut self, listener: Arc<dyn ServiceListener<ExecutionOrder>>) {
        self.execution_listeners.push(listener);
    }

    pub fn execution_listeners(&self) -> &[Arc<dyn ServiceListener<ExecutionOrder>>] {
        &self.execution_listeners
    }

    pub fn orders_sent(&self) -> u64 {
        self.connector.sent()
    }
}

impl Default for ExecutionService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for ExecutionService {
    type Key = ProductId;
    type Value = ExecutionOrder;

    fn get_data(&self, key: &ProductId) -> Result<&ExecutionOrder, ServiceError> {
        self.store.get(key)
    }

    /// Stage 1: store and notify record-keeping listeners.
    fn on_message(&mut self, data: ExecutionOrder) -> Result<(), ServiceError> {
        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<ExecutionOrder>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<ExecutionOrder>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<ExecutionOrder> {
        &mut self.connector
    }
}

/// Runs both execution stages for every algo execution.
pub struct AlgoExecutionToExecutionListener {
    service: Shared<ExecutionService>,
}

impl AlgoExecutionToExecutionListener {
    pub fn new(service: Shared<ExecutionService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<AlgoExecution> for AlgoExecutionToExecutionListener {
    fn process_add(&self, data: &AlgoExecution) -> Result<(), ServiceError> {
        let mut service = self.service.lock();
        service.on_message(data.execution_order.clone())?;
        service.execute_order(data.execution_order.clone(), data.venue)
    }

    fn process_remove(&self, _data: &AlgoExecution) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &AlgoExecution) -> Result<(), ServiceError> {
        Ok(())
    }
}
