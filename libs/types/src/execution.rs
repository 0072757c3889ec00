//! Execution order types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{OrderId, ProductId};
use crate::numeric::format_fractional;
use crate::order::PricingSide;
use crate::product::{Bond, Product};
use crate::record::{CsvRecord, Keyed};

/// Order type sent to a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Fill-Or-Kill
    FOK,
    /// Immediate-Or-Cancel
    IOC,
    MARKET,
    LIMIT,
    STOP,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::FOK => "FOK",
            OrderType::IOC => "IOC",
            OrderType::MARKET => "MARKET",
            OrderType::LIMIT => "LIMIT",
            OrderType::STOP => "STOP",
        };
        f.write_str(s)
    }
}

/// Execution venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Venue {
    BROKERTEC,
    ESPEED,
    CME,
}

impl Venue {
    /// Routing rotation order
    pub const ALL: [Venue; 3] = [Venue::BROKERTEC, Venue::ESPEED, Venue::CME];
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Venue::BROKERTEC => "BROKERTEC",
            Venue::ESPEED => "ESPEED",
            Venue::CME => "CME",
        };
        f.write_str(s)
    }
}

/// An order ready to be sent to a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOrder<P = Bond> {
    pub product: P,
    pub side: PricingSide,
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub price: Decimal,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub parent_order_id: OrderId,
    pub is_child_order: bool,
}

impl<P: Product> ExecutionOrder<P> {
    pub fn total_quantity(&self) -> i64 {
        self.visible_quantity + self.hidden_quantity
    }
}

impl<P: Product> Keyed for ExecutionOrder<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.product.product_id().clone()
    }
}

impl<P: Product> CsvRecord for ExecutionOrder<P> {
    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            self.side.to_string(),
            self.order_id.to_string(),
            self.order_type.to_string(),
            format_fractional(self.price),
            self.visible_quantity.to_string(),
            self.hidden_quantity.to_string(),
            self.parent_order_id.to_string(),
            if self.is_child_order { "YES" } else { "NO" }.to_string(),
        ]
    }
}

/// Execution order plus the venue it is routed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgoExecution<P = Bond> {
    pub execution_order: ExecutionOrder<P>,
    pub venue: Venue,
}

impl<P: Product> Keyed for AlgoExecution<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.execution_order.key()
    }
}
