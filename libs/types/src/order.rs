//! Market-data order types
//!
//! Implements the order book snapshot model:
//! - `Order`: one resting quote on a side
//! - `BidOffer`: top of book
//! - `OrderBook`: full bid and offer stacks for one product

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ServiceError;
use crate::ids::ProductId;
use crate::numeric::format_fractional;
use crate::product::{Bond, Product};
use crate::record::{CsvRecord, Keyed};

/// Side of a quote (market data, streams, execution orders)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PricingSide {
    BID,
    OFFER,
}

impl PricingSide {
    pub fn opposite(&self) -> Self {
        match self {
            PricingSide::BID => PricingSide::OFFER,
            PricingSide::OFFER => PricingSide::BID,
        }
    }
}

impl fmt::Display for PricingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingSide::BID => write!(f, "BID"),
            PricingSide::OFFER => write!(f, "OFFER"),
        }
    }
}

impl FromStr for PricingSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BID" => Ok(PricingSide::BID),
            "OFFER" => Ok(PricingSide::OFFER),
            other => Err(format!("unknown pricing side '{}'", other)),
        }
    }
}

/// A single quote in an order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub price: Decimal,
    pub quantity: i64,
    pub side: PricingSide,
}

impl Order {
    pub fn new(price: Decimal, quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            quantity,
            side,
        }
    }

    pub fn bid(price: Decimal, quantity: i64) -> Self {
        Self::new(price, quantity, PricingSide::BID)
    }

    pub fn offer(price: Decimal, quantity: i64) -> Self {
        Self::new(price, quantity, PricingSide::OFFER)
    }
}

/// Best bid and best offer of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidOffer {
    pub bid: Order,
    pub offer: Order,
}

impl BidOffer {
    pub fn spread(&self) -> Decimal {
        self.offer.price - self.bid.price
    }
}

/// Order book snapshot for one product
///
/// Constructed only through `from_orders`, which routes every order to the
/// stack matching its side, so a bid stack never holds an OFFER and vice
/// versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook<P = Bond> {
    product: P,
    bid_stack: Vec<Order>,
    offer_stack: Vec<Order>,
}

impl<P: Product> OrderBook<P> {
    /// Build a book from orders of either side, preserving arrival order
    /// within each side.
    pub fn from_orders(product: P, orders: impl IntoIterator<Item = Order>) -> Self {
        let (bid_stack, offer_stack) = orders
            .into_iter()
            .partition(|order| order.side == PricingSide::BID);

        Self {
            product,
            bid_stack,
            offer_stack,
        }
    }

    pub fn product(&self) -> &P {
        &self.product
    }

    pub fn bid_stack(&self) -> &[Order] {
        &self.bid_stack
    }

    pub fn offer_stack(&self) -> &[Order] {
        &self.offer_stack
    }

    /// Highest bid and lowest offer; the first order wins ties.
    pub fn best_bid_offer(&self) -> Result<BidOffer, ServiceError> {
        let empty = || ServiceError::EmptyBook {
            product: self.product.product_id().to_string(),
        };

        let bid = self
            .bid_stack
            .iter()
            .copied()
            .reduce(|best, o| if o.price > best.price { o } else { best })
            .ok_or_else(empty)?;

        let offer = self
            .offer_stack
            .iter()
            .copied()
            .reduce(|best, o| if o.price < best.price { o } else { best })
            .ok_or_else(empty)?;

        Ok(BidOffer { bid, offer })
    }

    /// Collapse each side to one order per distinct price, summing
    /// quantities. Bids come back highest first, offers lowest first.
    ///
    /// Fails with `EmptyBook` when either side has no orders.
    pub fn aggregate_depth(&self) -> Result<OrderBook<P>, ServiceError> {
        if self.bid_stack.is_empty() || self.offer_stack.is_empty() {
            return Err(ServiceError::EmptyBook {
                product: self.product.product_id().to_string(),
            });
        }

        let bid_levels = aggregate_levels(&self.bid_stack);
        let offer_levels = aggregate_levels(&self.offer_stack);

        let bids = bid_levels
            .into_iter()
            .rev()
            .map(|(price, quantity)| Order::bid(price, quantity));
        let offers = offer_levels
            .into_iter()
            .map(|(price, quantity)| Order::offer(price, quantity));

        Ok(OrderBook::from_orders(
            self.product.clone(),
            bids.chain(offers),
        ))
    }

    pub fn total_bid_quantity(&self) -> i64 {
        self.bid_stack.iter().map(|o| o.quantity).sum()
    }

    pub fn total_offer_quantity(&self) -> i64 {
        self.offer_stack.iter().map(|o| o.quantity).sum()
    }
}

fn aggregate_levels(orders: &[Order]) -> BTreeMap<Decimal, i64> {
    let mut levels = BTreeMap::new();
    for order in orders {
        *levels.entry(order.price).or_insert(0) += order.quantity;
    }
    levels
}

impl<P: Product> Keyed for OrderBook<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.product.product_id().clone()
    }
}

impl<P: Product> CsvRecord for OrderBook<P> {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.product.product_id().to_string()];
        for order in self.bid_stack.iter().chain(self.offer_stack.iter()) {
            fields.push(format_fractional(order.price));
            fields.push(order.quantity.to_string());
            fields.push(order.side.to_string());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::SecurityMaster;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_bond() -> Bond {
        SecurityMaster::treasuries()
            .lookup("91282CFX4")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_from_orders_routes_by_side() {
        let book = OrderBook::from_orders(
            make_bond(),
            vec![
                Order::bid(dec("99.5"), 10),
                Order::offer(dec("100.5"), 10),
                Order::bid(dec("99.0"), 20),
            ],
        );

        assert_eq!(book.bid_stack().len(), 2);
        assert_eq!(book.offer_stack().len(), 1);
        assert!(book.bid_stack().iter().all(|o| o.side == PricingSide::BID));
        assert!(book
            .offer_stack()
            .iter()
            .all(|o| o.side == PricingSide::OFFER));
    }

    #[test]
    fn test_best_offer_is_lowest() {
        let book = OrderBook::from_orders(
            make_bond(),
            vec![
                Order::bid(dec("99.0"), 1),
                Order::offer(dec("101.0"), 1),
                Order::offer(dec("100.5"), 2),
                Order::offer(dec("101.5"), 3),
            ],
        );

        let bbo = book.best_bid_offer().unwrap();
        assert_eq!(bbo.offer.price, dec("100.5"));
        assert_eq!(bbo.offer.quantity, 2);
    }

    #[test]
    fn test_best_bid_first_occurrence_wins_tie() {
        let book = OrderBook::from_orders(
            make_bond(),
            vec![
                Order::bid(dec("99.5"), 7),
                Order::bid(dec("99.5"), 9),
                Order::offer(dec("100.0"), 1),
            ],
        );

        let bbo = book.best_bid_offer().unwrap();
        assert_eq!(bbo.bid.quantity, 7);
        assert_eq!(bbo.spread(), dec("0.5"));
    }

    #[test]
    fn test_best_bid_offer_empty_side() {
        let book = OrderBook::from_orders(make_bond(), vec![Order::bid(dec("99.0"), 1)]);
        assert_eq!(
            book.best_bid_offer().unwrap_err(),
            ServiceError::EmptyBook {
                product: "91282CFX4".to_string()
            }
        );
    }

    #[test]
    fn test_aggregate_depth_groups_by_price() {
        let book = OrderBook::from_orders(
            make_bond(),
            vec![
                Order::bid(dec("100.0"), 5),
                Order::bid(dec("100.0"), 3),
                Order::bid(dec("99.5"), 2),
                Order::offer(dec("101.0"), 4),
                Order::offer(dec("100.5"), 1),
                Order::offer(dec("101.0"), 6),
            ],
        );

        let agg = book.aggregate_depth().unwrap();
        assert_eq!(
            agg.bid_stack(),
            &[Order::bid(dec("100.0"), 8), Order::bid(dec("99.5"), 2)]
        );
        assert_eq!(
            agg.offer_stack(),
            &[Order::offer(dec("100.5"), 1), Order::offer(dec("101.0"), 10)]
        );
        assert_eq!(agg.total_bid_quantity(), book.total_bid_quantity());
        assert_eq!(agg.total_offer_quantity(), book.total_offer_quantity());
    }

    #[test]
    fn test_aggregate_depth_empty_book() {
        let book = OrderBook::from_orders(make_bond(), Vec::new());
        assert!(matches!(
            book.aggregate_depth(),
            Err(ServiceError::EmptyBook { .. })
        ));
    }

    #[test]
    fn test_aggregate_depth_one_sided_book() {
        let bids_only = OrderBook::from_orders(make_bond(), vec![Order::bid(dec("1"), 1)]);
        assert_eq!(
            bids_only.aggregate_depth().unwrap_err(),
            ServiceError::EmptyBook {
                product: "91282CFX4".to_string()
            }
        );

        let offers_only = OrderBook::from_orders(make_bond(), vec![Order::offer(dec("1"), 1)]);
        assert!(matches!(
            offers_only.aggregate_depth(),
            Err(ServiceError::EmptyBook { .. })
        ));
    }

    #[test]
    fn test_pricing_side_parse() {
        assert_eq!("BID".parse::<PricingSide>().unwrap(), PricingSide::BID);
        assert_eq!("OFFER".parse::<PricingSide>().unwrap(), PricingSide::OFFER);
        assert!("ASK".parse::<PricingSide>().is_err());
    }
}
