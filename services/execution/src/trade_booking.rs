//! Trade booking
//!
//! Trades arrive from `trades.txt`
//! (`productId,tradeId,price,book,quantity,side`) and from executed
//! orders. An executed BID is booked as a SELL, an executed OFFER as a
//! BUY, across books TRSY1 → TRSY2 → TRSY3.

use std::sync::Arc;

use tracing::{debug, info};

use soa::{Connector, Fields, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::execution::ExecutionOrder;
use types::ids::TradeId;
use types::order::PricingSide;
use types::product::{Product, SecurityMaster};
use types::trade::{Side, Trade};

/// Books that executed orders rotate through.
pub const BOOKS: [&str; 3] = ["TRSY1", "TRSY2", "TRSY3"];

/// Subscribe-only connector over `trades.txt`.
pub struct TradeBookingConnector {
    master: Arc<SecurityMaster>,
}

impl TradeBookingConnector {
    pub fn new(master: Arc<SecurityMaster>) -> Self {
        Self { master }
    }
}

impl Connector<Trade> for TradeBookingConnector {
    fn name(&self) -> &'static str {
        "TradeBookingConnector"
    }

    fn decode(&mut self, fields: &Fields<'_>) -> Result<Option<Trade>, ServiceError> {
        fields.expect_len(6)?;

        let product = self.master.lookup(fields.str(0)?)?.clone();
        let book = fields.str(3)?;
        if book.is_empty() {
            return Err(fields.error("empty book"));
        }

        Ok(Some(Trade {
            product,
            trade_id: TradeId::new(fields.str(1)?),
            price: fields.price(2)?,
            book: book.to_string(),
            quantity: fields.parse(4, "quantity")?,
            side: fields.parse(5, "side")?,
        }))
    }
}

pub struct TradeBookingService {
    store: Store<Trade>,
    connector: TradeBookingConnector,
    executions_booked: u64,
}

impl TradeBookingService {
    pub fn new(master: Arc<SecurityMaster>) -> Self {
        info!("TradeBookingService initialized");
        Self {
            store: Store::new("trade-booking"),
            connector: TradeBookingConnector::new(master),
            executions_booked: 0,
        }
    }

    /// Store a trade and fan it out.
    pub fn book_trade(&mut self, trade: Trade) -> Result<(), ServiceError> {
        debug!(
            trade_id = %trade.trade_id,
            product = %trade.product.product_id(),
            book = %trade.book,
            side = %trade.side,
            quantity = trade.quantity,
            "Booking trade"
        );
        self.store.publish(trade)
    }

    /// Book the fill of an executed order.
    pub fn book_execution(&mut self, order: &ExecutionOrder) -> Result<(), ServiceError> {
        let side = match order.side {
            PricingSide::BID => Side::SELL,
            PricingSide::OFFER => Side::BUY,
        };
        let book = BOOKS[(self.executions_booked % BOOKS.len() as u64) as usize];
        self.executions_booked += 1;

        self.book_trade(Trade {
            product: order.product.clone(),
            trade_id: TradeId::new(order.order_id.as_str()),
            price: order.price,
            book: book.to_string(),
            quantity: order.total_quantity(),
            side,
        })
    }

    pub fn trade_count(&self) -> usize {
        self.store.len()
    }
}

impl Service for TradeBookingService {
    type Key = TradeId;
    type Value = Trade;

    fn get_data(&self, key: &TradeId) -> Result<&Trade, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: Trade) -> Result<(), ServiceError> {
        self.book_trade(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Trade>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Trade>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<Trade> {
        &mut self.connector
    }
}

/// Books a trade for every executed order (stage-2 execution listener).
pub struct ExecutionToTradeBookingListener {
    service: Shared<TradeBookingService>,
}

impl ExecutionToTradeBookingListener {
    pub fn new(service: Shared<TradeBookingService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<ExecutionOrder> for ExecutionToTradeBookingListener {
    fn process_add(&self, data: &ExecutionOrder) -> Result<(), ServiceError> {
        self.service.lock().book_execution(data)
    }

    fn process_remove(&self, _data: &ExecutionOrder) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &ExecutionOrder) -> Result<(), ServiceError> {
        Ok(())
    }
}
