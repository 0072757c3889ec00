//! Booked trade types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::TradeId;
use crate::numeric::format_fractional;
use crate::product::{Bond, Product};
use crate::record::{CsvRecord, Keyed};

/// Trade direction from the desk's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    BUY,
    SELL,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    /// Signed quantity contribution to a position.
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            Side::BUY => quantity,
            Side::SELL => -quantity,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::BUY => write!(f, "BUY"),
            Side::SELL => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BUY" => Ok(Side::BUY),
            "SELL" => Ok(Side::SELL),
            other => Err(format!("unknown trade side '{}'", other)),
        }
    }
}

/// A booked trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade<P = Bond> {
    pub product: P,
    pub trade_id: TradeId,
    pub price: Decimal,
    pub book: String,
    pub quantity: i64,
    pub side: Side,
}

impl<P: Product> Keyed for Trade<P> {
    type Key = TradeId;

    fn key(&self) -> TradeId {
        self.trade_id.clone()
    }
}

impl<P: Product> CsvRecord for Trade<P> {
    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            self.trade_id.to_string(),
            format_fractional(self.price),
            self.book.clone(),
            self.quantity.to_string(),
            self.side.to_string(),
        ]
    }
}
