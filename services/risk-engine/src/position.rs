//! Position service: per-book positions from booked trades

use std::sync::Arc;

use tracing::{debug, info};

use soa::{Connector, NoConnector, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::ids::ProductId;
use types::position::Position;
use types::product::Product;
use types::trade::Trade;

pub struct PositionService {
    store: Store<Position>,
    connector: NoConnector,
}

impl PositionService {
    pub fn new() -> Self {
        info!("PositionService initialized");
        Self {
            store: Store::new("position"),
            connector: NoConnector,
        }
    }

    /// Apply a trade to its book (BUY adds, SELL subtracts), then store and
    /// fan out the product's position.
    pub fn add_trade(&mut self, trade: &Trade) -> Result<(), ServiceError> {
        let key = trade.product.product_id().clone();
        let mut position = self
            .store
            .get(&key)
            .map(Clone::clone)
            .unwrap_or_else(|_| Position::new(trade.product.clone()));

        position.add(&trade.book, trade.side.signed(trade.quantity));
        debug!(
            product = %key,
            book = %trade.book,
            aggregate = position.aggregate(),
            "Position updated"
        );

        self.store.publish(position)
    }
}

impl Default for PositionService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for PositionService {
    type Key = ProductId;
    type Value = Position;

    fn get_data(&self, key: &ProductId) -> Result<&Position, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: Position) -> Result<(), ServiceError> {
        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Position>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Position>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<Position> {
        &mut self.connector
    }
}

/// Applies every booked trade to positions.
pub struct TradeBookingToPositionListener {
    service: Shared<PositionService>,
}

impl TradeBookingToPositionListener {
    pub fn new(service: Shared<PositionService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Trade> for TradeBookingToPositionListener {
    fn process_add(&self, data: &Trade) -> Result<(), ServiceError> {
        self.service.lock().add_trade(data)
    }

    fn process_remove(&self, _data: &Trade) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &Trade) -> Result<(), ServiceError> {
        Ok(())
    }
}
