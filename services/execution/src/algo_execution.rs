//! Algorithmic execution on tight markets
//!
//! When a book's best spread is at or inside `max_spread`, the algo
//! crosses it with a MARKET order for the full top-of-book size:
//! - even executions take the best bid (BID side)
//! - odd executions take the best offer (OFFER side)
//!
//! Venues rotate BROKERTEC → ESPEED → CME.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use soa::{Connector, NoConnector, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::execution::{AlgoExecution, ExecutionOrder, OrderType, Venue};
use types::ids::{OrderId, ProductId};
use types::order::{OrderBook, PricingSide};
use types::product::Product;

/// Configuration for the execution algo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgoExecutionConfig {
    /// Widest spread the algo will cross (default 1/128).
    pub max_spread: Decimal,
}

impl Default for AlgoExecutionConfig {
    fn default() -> Self {
        Self {
            max_spread: Decimal::new(78_125, 7),
        }
    }
}

pub struct AlgoExecutionService {
    config: AlgoExecutionConfig,
    store: Store<AlgoExecution>,
    connector: NoConnector,
    execution_count: u64,
    skipped: u64,
}

impl AlgoExecutionService {
    pub fn new(config: AlgoExecutionConfig) -> Self {
        info!(max_spread = %config.max_spread, "AlgoExecutionService initialized");
        Self {
            config,
            store: Store::new("algo-execution"),
            connector: NoConnector,
            execution_count: 0,
            skipped: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AlgoExecutionConfig::default())
    }

    pub fn execution_count(&self) -> u64 {
        self.execution_count
    }

    /// Books seen with a spread too wide to cross.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Cross the spread on `book` if it is tight enough.
    pub fn execute(&mut self, book: &OrderBook) -> Result<(), ServiceError> {
        let product = book.product();
        let bbo = book.best_bid_offer()?;
        let spread = bbo.spread();

        if spread > self.config.max_spread {
            self.skipped += 1;
            debug!(product = %product.product_id(), %spread, "Spread too wide, no execution");
            return Ok(());
        }

        let count = self.execution_count;
        let (side, top) = if count % 2 == 0 {
            (PricingSide::BID, bbo.bid)
        } else {
            (PricingSide::OFFER, bbo.offer)
        };
        let venue = Venue::ALL[(count % Venue::ALL.len() as u64) as usize];
        self.execution_count += 1;

        let order = ExecutionOrder {
            product: product.clone(),
            side,
            order_id: OrderId::new(format!("AE{:010}", count)),
            order_type: OrderType::MARKET,
            price: top.price,
            visible_quantity: top.quantity,
            hidden_quantity: 0,
            parent_order_id: OrderId::new(""),
            is_child_order: false,
        };

        info!(
            product = %product.product_id(),
            order_id = %order.order_id,
            %side,
            %venue,
            quantity = top.quantity,
            "Crossing the spread"
        );

        self.on_message(AlgoExecution {
            execution_order: order,
            venue,
        })
    }
}

impl Service for AlgoExecutionService {
    type Key = ProductId;
    type Value = AlgoExecution;

    fn get_data(&self, key: &ProductId) -> Result<&AlgoExecution, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: AlgoExecution) -> Result<(), ServiceError> {
        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<AlgoExecution>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<AlgoExecution>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<AlgoExecution> {
        &mut self.connector
    }
}

/// Feeds order book snapshots into the algo.
pub struct MarketDataToAlgoExecutionListener {
    service: Shared<AlgoExecutionService>,
}

impl MarketDataToAlgoExecutionListener {
    pub fn new(service: Shared<AlgoExecutionService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<OrderBook> for MarketDataToAlgoExecutionListener {
    fn process_add(&self, data: &OrderBook) -> Result<(), ServiceError> {
        self.service.lock().execute(data)
    }

    fn process_remove(&self, _data: &OrderBook) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &OrderBook) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::from_ticks;
    use types::order::Order;
    use types::product::SecurityMaster;

    fn make_book(cusip: &str, bid_ticks: i64, offer_ticks: i64) -> OrderBook {
        let bond = SecurityMaster::treasuries().lookup(cusip).unwrap().clone();
        OrderBook::from_orders(
            bond,
            vec![
                Order::bid(from_ticks(bid_ticks), 10_000_000),
                Order::offer(from_ticks(offer_ticks), 20_000_000),
                Order::bid(from_ticks(bid_ticks - 1), 30_000_000),
                Order::offer(from_ticks(offer_ticks + 1), 40_000_000),
            ],
        )
    }

    #[test]
    fn test_wide_spread_skipped() {
        let mut service = AlgoExecutionService::with_defaults();
        service
            .execute(&make_book("91282CFX4", 25_600, 25_603))
            .unwrap();

        assert_eq!(service.execution_count(), 0);
        assert_eq!(service.skipped(), 1);
        assert!(service.get_data(&ProductId::new("91282CFX4")).is_err());
    }

    #[test]
    fn test_sides_alternate_and_venues_rotate() {
        let mut service = AlgoExecutionService::with_defaults();
        let mut sides = Vec::new();
        let mut venues = Vec::new();
        let mut prices = Vec::new();
        let mut sizes = Vec::new();

        for _ in 0..4 {
            service
                .execute(&make_book("91282CFX4", 25_600, 25_602))
                .unwrap();
            let algo = service.get_data(&ProductId::new("91282CFX4")).unwrap();
            sides.push(algo.execution_order.side);
            venues.push(algo.venue);
            prices.push(algo.execution_order.price);
            sizes.push(algo.execution_order.visible_quantity);
        }

        assert_eq!(
            sides,
            vec![
                PricingSide::BID,
                PricingSide::OFFER,
                PricingSide::BID,
                PricingSide::OFFER,
            ]
        );
        assert_eq!(
            venues,
            vec![
                Venue::BROKERTEC,
                Venue::ESPEED,
                Venue::CME,
                Venue::BROKERTEC,
            ]
        );
        let (bid, offer) = (from_ticks(25_600), from_ticks(25_602));
        assert_eq!(prices, vec![bid, offer, bid, offer]);
        assert_eq!(sizes, vec![10_000_000, 20_000_000, 10_000_000, 20_000_000]);
    }

    #[test]
    fn test_order_shape() {
        let mut service = AlgoExecutionService::with_defaults();
        service
            .execute(&make_book("91282CFW6", 25_600, 25_601))
            .unwrap();

        let order = &service
            .get_data(&ProductId::new("91282CFW6"))
            .unwrap()
            .execution_order;
        assert_eq!(order.order_type, OrderType::MARKET);
        assert_eq!(order.hidden_quantity, 0);
        assert!(!order.is_child_order);
        assert_eq!(order.order_id.as_str(), "AE0000000000");
    }

    #[test]
    fn test_empty_book_is_error() {
        let mut service = AlgoExecutionService::with_defaults();
        let bond = SecurityMaster::treasuries()
            .lookup("91282CFX4")
            .unwrap()
            .clone();
        let book = OrderBook::from_orders(bond, vec![Order::bid(from_ticks(1), 1)]);
        assert!(matches!(
            service.execute(&book),
            Err(ServiceError::EmptyBook { .. })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: AlgoExecutionConfig =
            serde_json::from_str(r#"{"max_spread": "0.015625"}"#).unwrap();
        assert_eq!(config.max_spread, Decimal::new(15_625, 6));

        let defaults: AlgoExecutionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, AlgoExecutionConfig::default());
    }
}
