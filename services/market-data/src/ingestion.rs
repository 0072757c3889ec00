//! Order record ingestion for the Market Data Service
//!
//! Reads `marketdata.txt` records (`productId,price,quantity,side`) and
//! groups them into order book snapshots. A snapshot is exactly
//! `2 * book_depth` consecutive records for one product.
//!
//! Invariants:
//! - Every batch holds a single product
//! - Input must end on a batch boundary

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use soa::{Connector, Fields};
use types::errors::ServiceError;
use types::order::{Order, OrderBook, PricingSide};
use types::product::{Bond, Product, SecurityMaster};

/// Configuration for the market data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Price levels per side in each snapshot.
    pub book_depth: usize,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self { book_depth: 10 }
    }
}

impl MarketDataConfig {
    /// Records per snapshot (both sides).
    pub fn batch_size(&self) -> usize {
        self.book_depth * 2
    }
}

/// Partially read snapshot
struct PendingBatch {
    product: Bond,
    first_line: u64,
    orders: Vec<Order>,
}

/// Subscribe-only connector that turns order records into order books.
pub struct MarketDataConnector {
    master: Arc<SecurityMaster>,
    batch_size: usize,
    pending: Option<PendingBatch>,
    /// Total snapshots emitted.
    books_built: u64,
}

impl MarketDataConnector {
    pub fn new(config: &MarketDataConfig, master: Arc<SecurityMaster>) -> Self {
        let batch_size = config.batch_size();
        info!(
            book_depth = config.book_depth,
            batch_size, "MarketDataConnector initialized"
        );

        Self {
            master,
            batch_size,
            pending: None,
            books_built: 0,
        }
    }

    pub fn books_built(&self) -> u64 {
        self.books_built
    }

    fn decode_order(&self, fields: &Fields<'_>) -> Result<(Bond, Order), ServiceError> {
        fields.expect_len(4)?;

        let product = self.master.lookup(fields.str(0)?)?.clone();
        let price = fields.price(1)?;
        let quantity: i64 = fields.parse(2, "quantity")?;
        let side: PricingSide = fields.parse(3, "side")?;

        Ok((product, Order::new(price, quantity, side)))
    }
}

impl Connector<OrderBook> for MarketDataConnector {
    fn name(&self) -> &'static str {
        "MarketDataConnector"
    }

    fn decode(&mut self, fields: &Fields<'_>) -> Result<Option<OrderBook>, ServiceError> {
        let (product, order) = self.decode_order(fields)?;

        let batch = self.pending.get_or_insert_with(|| PendingBatch {
            product: product.clone(),
            first_line: fields.line(),
            orders: Vec::new(),
        });

        if batch.product.product_id() != product.product_id() {
            return Err(fields.error(format!(
                "snapshot started at line {} for {} mixes in {}",
                batch.first_line,
                batch.product.product_id(),
                product.product_id()
            )));
        }

        batch.orders.push(order);
        if batch.orders.len() < self.batch_size {
            return Ok(None);
        }

        let Some(batch) = self.pending.take() else {
            return Ok(None);
        };
        self.books_built += 1;
        debug!(
            product = %batch.product.product_id(),
            orders = batch.orders.len(),
            first_line = batch.first_line,
            "Order book snapshot complete"
        );

        Ok(Some(OrderBook::from_orders(batch.product, batch.orders)))
    }

    fn finish(&mut self) -> Result<(), ServiceError> {
        match self.pending.take() {
            None => Ok(()),
            Some(batch) => {
                error!(
                    product = %batch.product.product_id(),
                    orders = batch.orders.len(),
                    expected = self.batch_size,
                    "Trailing partial snapshot"
                );
                Err(ServiceError::parse(
                    batch.first_line,
                    format!(
                        "incomplete snapshot for {}: {} of {} records",
                        batch.product.product_id(),
                        batch.orders.len(),
                        self.batch_size
                    ),
                ))
            }
        }
    }
}
