//! Pricing and streaming types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::numeric::format_fractional;
use crate::order::PricingSide;
use crate::product::{Bond, Product};
use crate::record::{CsvRecord, Keyed};

/// Mid price and bid/offer spread for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price<P = Bond> {
    pub product: P,
    pub mid: Decimal,
    pub bid_offer_spread: Decimal,
}

impl<P: Product> Price<P> {
    pub fn new(product: P, mid: Decimal, bid_offer_spread: Decimal) -> Self {
        Self {
            product,
            mid,
            bid_offer_spread,
        }
    }

    /// Derive mid and spread from a two-sided quote.
    pub fn from_bid_offer(product: P, bid: Decimal, offer: Decimal) -> Self {
        Self::new(product, (bid + offer) / Decimal::TWO, offer - bid)
    }

    pub fn bid(&self) -> Decimal {
        self.mid - self.bid_offer_spread / Decimal::TWO
    }

    pub fn offer(&self) -> Decimal {
        self.mid + self.bid_offer_spread / Decimal::TWO
    }
}

impl<P: Product> Keyed for Price<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.product.product_id().clone()
    }
}

impl<P: Product> CsvRecord for Price<P> {
    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            format_fractional(self.mid),
            format_fractional(self.bid_offer_spread),
        ]
    }
}

/// One side of a published two-way stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStreamOrder {
    pub price: Decimal,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub side: PricingSide,
}

impl PriceStreamOrder {
    pub fn new(
        price: Decimal,
        visible_quantity: i64,
        hidden_quantity: i64,
        side: PricingSide,
    ) -> Self {
        Self {
            price,
            visible_quantity,
            hidden_quantity,
            side,
        }
    }

    fn fields(&self) -> [String; 4] {
        [
            format_fractional(self.price),
            self.visible_quantity.to_string(),
            self.hidden_quantity.to_string(),
            self.side.to_string(),
        ]
    }
}

/// Two-way price stream for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStream<P = Bond> {
    pub product: P,
    pub bid_order: PriceStreamOrder,
    pub offer_order: PriceStreamOrder,
}

impl<P: Product> PriceStream<P> {
    pub fn new(product: P, bid_order: PriceStreamOrder, offer_order: PriceStreamOrder) -> Self {
        Self {
            product,
            bid_order,
            offer_order,
        }
    }
}

impl<P: Product> Keyed for PriceStream<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.product.product_id().clone()
    }
}

impl<P: Product> CsvRecord for PriceStream<P> {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.product.product_id().to_string()];
        fields.extend(self.bid_order.fields());
        fields.extend(self.offer_order.fields());
        fields
    }
}

/// Stream produced by the quoting algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgoStream<P = Bond> {
    pub price_stream: PriceStream<P>,
}

impl<P: Product> AlgoStream<P> {
    pub fn new(price_stream: PriceStream<P>) -> Self {
        Self { price_stream }
    }
}

impl<P: Product> Keyed for AlgoStream<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.price_stream.key()
    }
}
